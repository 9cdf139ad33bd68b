//! Certificate eligibility

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CertificateError {
    #[error("complete at least {required}% of the course to generate your certificate ({percentage}% so far)")]
    BelowThreshold { percentage: u8, required: u8 },
}

/// Data the print collaborator needs to lay out a certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub percentage: u8,
    pub issued_on: NaiveDate,
}

/// Gate certificate generation on completion percentage
pub fn issue_certificate(
    percentage: u8,
    threshold: u8,
    issued_on: NaiveDate,
) -> Result<Certificate, CertificateError> {
    if percentage < threshold {
        return Err(CertificateError::BelowThreshold {
            percentage,
            required: threshold,
        });
    }
    Ok(Certificate {
        percentage,
        issued_on,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::CERTIFICATE_THRESHOLD;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_79_blocks() {
        let err = issue_certificate(79, CERTIFICATE_THRESHOLD, today()).unwrap_err();
        assert_eq!(
            err,
            CertificateError::BelowThreshold {
                percentage: 79,
                required: 80
            }
        );
        assert!(err.to_string().contains("at least 80%"));
    }

    #[test]
    fn test_80_proceeds() {
        let cert = issue_certificate(80, CERTIFICATE_THRESHOLD, today()).unwrap();
        assert_eq!(cert.percentage, 80);
        assert_eq!(cert.issued_on, today());
    }
}
