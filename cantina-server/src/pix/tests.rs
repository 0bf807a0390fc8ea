use super::*;

fn params<'a>(amount: Option<Money>, txid: Option<&'a str>) -> ChargeParams<'a> {
    ChargeParams {
        pix_key: "chave@cantina.com.br",
        merchant_name: "Cantina Escolar",
        merchant_city: "SAO PAULO",
        amount,
        txid,
    }
}

#[test]
fn field_length_is_zero_padded() {
    assert_eq!(field("00", "01"), "000201");
    assert_eq!(field("58", "BR"), "5802BR");
    assert_eq!(field("53", "986"), "5303986");
}

#[test]
fn payload_starts_with_format_indicator() {
    let payload = generate_payload(&params(None, Some("TX1")));
    assert!(payload.starts_with("000201"));
}

#[test]
fn merchant_account_nests_gui_and_key() {
    let payload = generate_payload(&params(None, Some("TX1")));
    // 14-char GUI + 20-char key, each with a 4-char tag+length header:
    // outer tag 26 carries 18 + 24 = 42 chars.
    assert!(payload.contains("26420014br.gov.bcb.pix0120chave@cantina.com.br"));
}

#[test]
fn amount_tag_uses_two_decimals() {
    // Scenario: charge for 18.00 — tag 54 must carry "18.00" exactly
    let amount: Money = "18.00".parse().unwrap();
    let payload = generate_payload(&params(Some(amount), Some("TX1")));
    assert!(payload.contains("540518.00"));
}

#[test]
fn amount_tag_omitted_when_absent_or_zero() {
    // Check the body only; the trailing CRC hex could spell anything.
    let no_amount = generate_payload(&params(None, Some("TX1")));
    assert!(!no_amount[..no_amount.len() - 4].contains("5405"));
    let zero = generate_payload(&params(Some(Money::ZERO), Some("TX1")));
    assert!(!zero[..zero.len() - 4].contains("5405"));
}

#[test]
fn additional_data_wraps_txid() {
    let payload = generate_payload(&params(None, Some("ABCD1234")));
    // tag 05 value is 8 chars; outer tag 62 covers the nested header too
    assert!(payload.contains("62120508ABCD1234"));
}

#[test]
fn generated_txid_has_prefix_and_entropy() {
    let a = generate_txid();
    let b = generate_txid();
    assert!(a.starts_with("CANTINA"));
    assert!(a.len() > "CANTINA".len() + 7);
    assert!(
        a[7..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    );
    assert_ne!(a, b);
}

#[test]
fn crc_round_trip() {
    // The final 4 hex digits must equal the CRC of the payload with
    // only the "6304" placeholder in their place.
    let amount: Money = "42.50".parse().unwrap();
    let payload = generate_payload(&params(Some(amount), None));
    let (body, crc_hex) = payload.split_at(payload.len() - 4);
    assert!(body.ends_with("6304"));
    let expected = crc16_ccitt(body);
    assert_eq!(crc_hex, format!("{expected:04X}"));
}

#[test]
fn crc_is_uppercase_hex() {
    let payload = generate_payload(&params(None, Some("TX1")));
    let crc_hex = &payload[payload.len() - 4..];
    assert!(
        crc_hex
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    );
}

// ── key validation ──────────────────────────────────────────────────

#[test]
fn accepts_valid_cpf() {
    assert!(validate_pix_key("11144477735"));
}

#[test]
fn rejects_repeated_digit_cpf() {
    // Passes the mod-11 arithmetic but is not a real CPF
    assert!(!validate_pix_key("11111111111"));
}

#[test]
fn rejects_cpf_with_bad_check_digit() {
    assert!(!validate_pix_key("11144477736"));
}

#[test]
fn accepts_valid_cnpj() {
    assert!(validate_pix_key("11222333000181"));
}

#[test]
fn rejects_cnpj_with_bad_check_digit() {
    assert!(!validate_pix_key("11222333000182"));
}

#[test]
fn email_needs_a_dotted_domain() {
    assert!(!validate_pix_key("a@b"));
    assert!(validate_pix_key("a@b.com"));
    assert!(!validate_pix_key("@b.com"));
    assert!(!validate_pix_key("a@b@c.com"));
}

#[test]
fn accepts_uuid_random_key() {
    assert!(validate_pix_key("123e4567-e89b-12d3-a456-426614174000"));
    assert!(!validate_pix_key("123e4567-e89b-12d3-a456-42661417400"));
    assert!(!validate_pix_key("123e4567e89b12d3a456426614174000"));
}

#[test]
fn accepts_ten_digit_phone_only() {
    assert!(validate_pix_key("1199999000"));
    // 11 digits always go through the CPF checksum
    assert!(!validate_pix_key("11999990000"));
}

#[test]
fn strips_whitespace_before_classifying() {
    assert!(validate_pix_key("1114 4477 735"));
    assert!(validate_pix_key("  a@b.com  "));
}

#[test]
fn rejects_garbage() {
    assert!(!validate_pix_key(""));
    assert!(!validate_pix_key("not-a-key"));
    assert!(!validate_pix_key("111.444.777-35"));
}
