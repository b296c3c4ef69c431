use contacts_core::{Field, FieldError, FieldKind};

#[test]
fn every_ten_digit_string_is_a_valid_phone() {
    for seed in [0_u64, 1, 42, 1_234_567_890, 9_999_999_999] {
        let raw = format!("{seed:010}");
        let phone = Field::phone(raw.as_str()).unwrap();
        assert_eq!(phone.value(), raw);
        assert_eq!(phone.kind(), FieldKind::Phone);
    }
}

#[test]
fn malformed_phones_are_rejected_with_invalid_value() {
    for raw in ["", "123", "12345678901", "123456789x", "+380501234", " 123456789", "12345 6789"] {
        let err = Field::phone(raw).unwrap_err();
        assert_eq!(
            err,
            FieldError::InvalidValue {
                kind: FieldKind::Phone,
                value: raw.to_string(),
            },
            "{raw:?}"
        );
    }
}

#[test]
fn alphabetic_names_are_accepted_and_others_rejected() {
    for raw in ["john", "Mary", "Zoe", "Олександр"] {
        assert_eq!(Field::name(raw).unwrap().value(), raw);
    }
    for raw in ["", "john1", "john smith", "john-paul", "j.", "_"] {
        assert!(Field::name(raw).is_err(), "{raw:?} should be rejected");
    }
}

#[test]
fn birthdays_must_be_real_dates_in_day_month_year_order() {
    assert!(Field::birthday("31.12.1999").is_ok());
    for raw in ["30.02.2000", "31.04.2001", "12.31.1999", "1999.12.31", "31/12/1999", "soon"] {
        assert!(Field::birthday(raw).is_err(), "{raw:?} should be rejected");
    }
}

#[test]
fn set_value_revalidates_and_is_atomic() {
    let mut name = Field::name("ann").unwrap();

    name.set_value("anna").unwrap();
    assert_eq!(name.value(), "anna");

    assert!(name.set_value("anna2").is_err());
    assert_eq!(name.value(), "anna");
}

#[test]
fn field_error_message_names_the_rule() {
    let err = Field::phone("123").unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid phone `123`: expected exactly 10 digits"
    );
}
