use proptest::prelude::*;

use relief_types::validation::{
    is_valid_national_id, is_valid_phone, is_valid_pin, sanitize_digits,
};
use relief_types::{DetailedAddress, MoneyAmount, NationalId, Pin, Timestamp};

proptest! {
    /// Every 9-digit string is a valid national ID.
    #[test]
    fn nine_digits_always_valid(s in "[0-9]{9}") {
        prop_assert!(is_valid_national_id(&s));
        prop_assert!(NationalId::parse(&s).is_ok());
    }

    /// Any digit string whose length is not 9 is rejected.
    #[test]
    fn wrong_length_national_id_rejected(s in "[0-9]{0,20}") {
        prop_assume!(s.len() != 9);
        prop_assert!(!is_valid_national_id(&s));
    }

    /// A single non-digit anywhere in a 9-char string is rejected.
    #[test]
    fn non_digit_national_id_rejected(
        prefix in "[0-9]{0,8}",
        bad in "[^0-9]",
    ) {
        let mut s = prefix.clone();
        s.push_str(&bad);
        while s.chars().count() < 9 {
            s.push('1');
        }
        prop_assert!(!is_valid_national_id(&s));
    }

    /// Every 6-digit string is a valid PIN.
    #[test]
    fn six_digits_always_valid_pin(s in "[0-9]{6}") {
        prop_assert!(is_valid_pin(&s));
        prop_assert!(Pin::parse(&s).is_ok());
    }

    /// Any digit string whose length is not 6 is rejected as a PIN.
    #[test]
    fn wrong_length_pin_rejected(s in "[0-9]{0,20}") {
        prop_assume!(s.len() != 6);
        prop_assert!(!is_valid_pin(&s));
    }

    /// Arbitrary strings containing a non-digit are never PINs.
    #[test]
    fn non_digit_pin_rejected(s in ".*[^0-9].*") {
        prop_assert!(!is_valid_pin(&s));
    }

    /// Phone numbers: exactly `05` + 8 digits.
    #[test]
    fn phone_shape(rest in "[0-9]{8}") {
        let phone = format!("05{rest}");
        prop_assert!(is_valid_phone(&phone));
        let other = format!("06{rest}");
        prop_assert!(!is_valid_phone(&other));
    }

    /// Validators are deterministic.
    #[test]
    fn validators_are_deterministic(s in ".{0,12}") {
        prop_assert_eq!(is_valid_national_id(&s), is_valid_national_id(&s));
        prop_assert_eq!(is_valid_pin(&s), is_valid_pin(&s));
        prop_assert_eq!(is_valid_phone(&s), is_valid_phone(&s));
    }

    /// Sanitized output is digits only and never exceeds the limit.
    #[test]
    fn sanitize_yields_digits_within_limit(s in ".*", max in 0usize..12) {
        let out = sanitize_digits(&s, max);
        prop_assert!(out.len() <= max);
        prop_assert!(out.bytes().all(|b| b.is_ascii_digit()));
    }

    /// Address summary never contains empty segments.
    #[test]
    fn address_summary_has_no_empty_parts(
        governorate in "[a-z ]{0,6}",
        city in "[a-z ]{0,6}",
        district in "[a-z ]{0,6}",
    ) {
        let addr = DetailedAddress { governorate, city, district, ..Default::default() };
        let summary = addr.summary();
        if !summary.is_empty() {
            for part in summary.split(DetailedAddress::SEPARATOR) {
                prop_assert!(!part.trim().is_empty());
            }
        }
    }

    /// Minor-unit amounts survive the major-unit conversion.
    #[test]
    fn money_minor_major_stable(minor in 0u64..10_000_000_000) {
        let amount = MoneyAmount::from_minor(minor);
        prop_assert_eq!(MoneyAmount::from_major(amount.as_major()), amount);
    }

    /// Timestamp expiry agrees with manual arithmetic.
    #[test]
    fn timestamp_has_expired(base in 0u64..1_000_000, window in 0u64..10_000, now in 0u64..2_000_000) {
        let t = Timestamp::from_millis(base);
        let expired = t.has_expired(std::time::Duration::from_millis(window), Timestamp::from_millis(now));
        prop_assert_eq!(expired, now >= base + window);
    }
}
