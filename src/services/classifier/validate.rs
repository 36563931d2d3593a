//! Checks run on classifier input before any matching happens.

use crate::json_utils::Numeric;
use crate::validation::ValidationError;

pub const MIN_DESCRIPTION_LEN: usize = 3;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MIN_ALPHANUMERIC_RATIO: f64 = 0.3;
pub const MAX_AMOUNT: f64 = 1_000_000.0;

/// Returns the trimmed description.
pub fn validate_description(description: Option<&str>) -> Result<&str, ValidationError> {
    let trimmed = description
        .map(str::trim)
        .ok_or(ValidationError::DescriptionRequired)?;
    let len = trimmed.chars().count();

    if len < MIN_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooShort);
    }
    if len > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooLong);
    }

    let alphanumeric = trimmed.chars().filter(char::is_ascii_alphanumeric).count();
    if (alphanumeric as f64 / len as f64) < MIN_ALPHANUMERIC_RATIO {
        return Err(ValidationError::DescriptionTooNoisy);
    }

    Ok(trimmed)
}

/// Amounts are optional; when given they must lie in `[0, 1_000_000]`.
pub fn validate_amount(amount: Option<&Numeric>) -> Result<Option<f64>, ValidationError> {
    let Some(amount) = amount else {
        return Ok(None);
    };
    let value = amount.as_f64().ok_or(ValidationError::AmountNotNumber)?;

    if value < 0.0 {
        return Err(ValidationError::AmountNegative);
    }
    if value > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge);
    }
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_bounds() {
        assert_eq!(
            validate_description(Some("ab")),
            Err(ValidationError::DescriptionTooShort)
        );
        assert_eq!(
            validate_description(Some("   ab   ")),
            Err(ValidationError::DescriptionTooShort)
        );
        assert_eq!(validate_description(Some("abc")), Ok("abc"));
        assert_eq!(validate_description(Some("asdf")), Ok("asdf"));

        let long = "a".repeat(MAX_DESCRIPTION_LEN + 1);
        assert_eq!(
            validate_description(Some(&long)),
            Err(ValidationError::DescriptionTooLong)
        );
        let max = "a".repeat(MAX_DESCRIPTION_LEN);
        assert!(validate_description(Some(&max)).is_ok());
    }

    #[test]
    fn test_description_required() {
        assert_eq!(
            validate_description(None),
            Err(ValidationError::DescriptionRequired)
        );
        assert_eq!(
            validate_description(Some("")),
            Err(ValidationError::DescriptionTooShort)
        );
    }

    #[test]
    fn test_description_alphanumeric_ratio() {
        // 2 of 7 characters are alphanumeric
        assert_eq!(
            validate_description(Some("a!!!!!b")),
            Err(ValidationError::DescriptionTooNoisy)
        );
        // 3 of 10 is exactly the minimum
        assert!(validate_description(Some("abc#######")).is_ok());
    }

    #[test]
    fn test_amount_rules() {
        assert_eq!(validate_amount(None), Ok(None));
        assert_eq!(validate_amount(Some(&Numeric::from(5.45))), Ok(Some(5.45)));
        assert_eq!(validate_amount(Some(&Numeric::from(0))), Ok(Some(0.0)));
        assert_eq!(
            validate_amount(Some(&Numeric::Text("1000000".into()))),
            Ok(Some(1_000_000.0))
        );
        assert_eq!(
            validate_amount(Some(&Numeric::from(-1))),
            Err(ValidationError::AmountNegative)
        );
        assert_eq!(
            validate_amount(Some(&Numeric::from(1_000_000.01))),
            Err(ValidationError::AmountTooLarge)
        );
        assert_eq!(
            validate_amount(Some(&Numeric::Text("ten".into()))),
            Err(ValidationError::AmountNotNumber)
        );
    }
}
