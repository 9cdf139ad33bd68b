//! ROI, impact metrics and challenge estimators
//!
//! Inputs arrive as raw form text. Anything absent, non-numeric or non-finite
//! reads as zero, so every calculator returns a (possibly degenerate) result.

use crate::config::ImpactAssumptions;

/// Parse a numeric form value, defaulting to 0.
///
/// Reads the longest leading number like a browser's `parseFloat`, so
/// `"12px"` is 12. Trailing text is ignored.
pub fn parse_input(raw: Option<&str>) -> f64 {
    raw.and_then(|s| numeric_prefix(s.trim_start()).parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Leading `[+-]digits[.digits][e[+-]digits]` slice of `s`
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if mantissa || frac_end > end + 1 {
            mantissa = true;
            end = frac_end;
        }
    }
    if !mantissa {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    &s[..end]
}

/// Parse a whole-number form value (day counters), defaulting to 0
pub fn parse_count(raw: Option<&str>) -> u32 {
    let value = parse_input(raw);
    if value <= 0.0 {
        0
    } else {
        value.trunc().min(u32::MAX as f64) as u32
    }
}

/// ROI calculator inputs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RoiInputs {
    /// Hours saved per week
    pub hours_saved: f64,
    /// Dollar value of an hour
    pub hourly_value: f64,
    /// New leads per week
    pub new_leads: f64,
    /// Lead conversion rate in percent
    pub conversion_rate: f64,
    /// Commission per closed deal
    pub avg_commission: f64,
}

/// ROI calculator outputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiEstimate {
    pub weekly_time_savings: f64,
    pub monthly_commissions: f64,
    pub annual_roi: f64,
    /// Bar fill, 0..=100
    pub bar_percent: f64,
}

/// Estimate return from time savings plus extra commissions
pub fn calculate_roi(inputs: &RoiInputs, bar_max: f64) -> RoiEstimate {
    let weekly_time_savings = inputs.hours_saved * inputs.hourly_value;

    let monthly_leads = inputs.new_leads * 4.0;
    let conversions = monthly_leads * (inputs.conversion_rate / 100.0);
    let monthly_commissions = conversions * inputs.avg_commission;

    let annual_roi = weekly_time_savings * 52.0 + monthly_commissions * 12.0;

    let bar_percent = if bar_max > 0.0 {
        (annual_roi / bar_max * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    RoiEstimate {
        weekly_time_savings,
        monthly_commissions,
        annual_roi,
        bar_percent,
    }
}

/// Impact metrics inputs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImpactInputs {
    /// Hours saved per week
    pub time_saved: f64,
    /// New leads per month
    pub new_leads: f64,
    /// Response time improvement in percent
    pub response_improvement: f64,
    /// Client satisfaction out of 10
    pub satisfaction: f64,
}

/// Impact metrics outputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactReport {
    pub weekly_savings: f64,
    pub monthly_savings: f64,
    pub yearly_savings: f64,
    /// Commission value of new leads per month
    pub lead_value: f64,
    pub response_improvement: f64,
    pub satisfaction: f64,
    pub total_annual_impact: f64,
}

pub fn calculate_impact(inputs: &ImpactInputs, assumptions: &ImpactAssumptions) -> ImpactReport {
    let weekly_savings = inputs.time_saved * assumptions.hourly_rate;
    let monthly_savings = weekly_savings * 4.0;
    let yearly_savings = monthly_savings * 12.0;

    let lead_value = inputs.new_leads * assumptions.conversion_rate * assumptions.avg_deal_value;

    ImpactReport {
        weekly_savings,
        monthly_savings,
        yearly_savings,
        lead_value,
        response_improvement: inputs.response_improvement,
        satisfaction: inputs.satisfaction,
        total_annual_impact: yearly_savings + lead_value * 12.0,
    }
}

/// Progress through the fixed-length implementation challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeProgress {
    pub percentage: u8,
    pub message: String,
}

pub fn challenge_progress(days: u32, total_days: u32) -> ChallengeProgress {
    let percentage = if total_days == 0 {
        0
    } else {
        ((days as f64 / total_days as f64) * 100.0).round().min(100.0) as u8
    };

    let message = match percentage {
        0 => format!("Ready to start your {}-day journey!", total_days),
        1..=24 => format!("{}% Complete - Great start! Keep building momentum!", percentage),
        25..=49 => format!("{}% Complete - You're making excellent progress!", percentage),
        50..=74 => format!("{}% Complete - Over halfway there! Stay focused!", percentage),
        75..=99 => format!("{}% Complete - Final stretch! You're almost there!", percentage),
        _ => "100% Complete - Congratulations! You're an AI Master!".to_string(),
    };

    ChallengeProgress {
        percentage,
        message,
    }
}

/// Dollar amount with thousands separators, at most two decimals
pub fn format_currency(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    match frac {
        0 => format!("{}${}", sign, grouped),
        f if f % 10 == 0 => format!("{}${}.{}", sign, grouped, f / 10),
        f => format!("{}${}.{:02}", sign, grouped, f),
    }
}
