//! PIX payload encoder
//!
//! Pure functions building an EMVCo merchant-presented QR payload
//! (the "copia e cola" string) with a CRC16-CCITT checksum, plus the
//! payment-key format validator (CPF / CNPJ / email / phone / random
//! UUID key).

use shared::Money;
use shared::util::now_millis;

#[cfg(test)]
mod tests;

/// Globally unique identifier for the PIX arrangement (tag 26, field 00)
const PIX_GUI: &str = "br.gov.bcb.pix";

/// Tag + length header of the CRC field, included in the checksum input
const CRC_PLACEHOLDER: &str = "6304";

/// Inputs for one charge payload
#[derive(Debug, Clone)]
pub struct ChargeParams<'a> {
    pub pix_key: &'a str,
    pub merchant_name: &'a str,
    pub merchant_city: &'a str,
    /// Omitted from the payload entirely when absent or zero
    pub amount: Option<Money>,
    /// Generated when absent
    pub txid: Option<&'a str>,
}

/// One TLV field: 2-char tag, 2-digit zero-padded decimal length, value
fn field(tag: &str, value: &str) -> String {
    format!("{tag}{:02}{value}", value.len())
}

/// Build the full payload string, checksum included.
pub fn generate_payload(params: &ChargeParams) -> String {
    let account = format!("{}{}", field("00", PIX_GUI), field("01", params.pix_key));

    let mut payload = String::new();
    payload.push_str(&field("00", "01")); // payload format indicator
    payload.push_str(&field("26", &account)); // merchant account info
    payload.push_str(&field("52", "0000")); // merchant category code
    payload.push_str(&field("53", "986")); // currency: BRL
    if let Some(amount) = params.amount
        && !amount.is_zero()
    {
        payload.push_str(&field("54", &amount.to_string()));
    }
    payload.push_str(&field("58", "BR"));
    payload.push_str(&field("59", params.merchant_name));
    payload.push_str(&field("60", params.merchant_city));

    let txid = params
        .txid
        .map(str::to_owned)
        .unwrap_or_else(generate_txid);
    payload.push_str(&field("62", &field("05", &txid))); // additional data

    // The checksum covers everything built so far plus its own
    // tag+length header.
    payload.push_str(CRC_PLACEHOLDER);
    let crc = crc16_ccitt(&payload);
    format!("{payload}{crc:04X}")
}

/// Default transaction id: "CANTINA" + epoch millis + 7 random
/// base36 uppercase characters.
pub fn generate_txid() -> String {
    use rand::Rng;
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..7)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("CANTINA{}{}", now_millis(), suffix)
}

/// CRC16-CCITT: polynomial 0x1021, initial 0xFFFF, MSB-first
/// bit-by-bit over each byte, output XORed with 0xFFFF.
pub fn crc16_ccitt(data: &str) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for byte in data.bytes() {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc ^ 0xFFFF
}

/// Classify and validate a configured PIX key.
///
/// Whitespace is stripped first. `@` means email; exactly 11 digits is
/// always treated as a CPF (checksum enforced); 14 digits as CNPJ;
/// 10 digits pass as a bare phone; 8-4-4-4-12 hex is a random key.
pub fn validate_pix_key(key: &str) -> bool {
    let key: String = key.split_whitespace().collect();
    if key.is_empty() {
        return false;
    }
    if key.contains('@') {
        return is_email_shaped(&key);
    }
    if key.chars().all(|c| c.is_ascii_digit()) {
        return match key.len() {
            11 => is_valid_cpf(&key),
            14 => is_valid_cnpj(&key),
            10 => true, // bare phone, no further check
            _ => false,
        };
    }
    is_uuid_shaped(&key)
}

/// Light email shape check: `local@domain.tld`, no whitespace,
/// exactly one `@`, at least one dot in the domain.
fn is_email_shaped(s: &str) -> bool {
    if s.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((head, tail)) => !head.is_empty() && !tail.is_empty(),
        None => false,
    }
}

fn digit_values(s: &str) -> Vec<u32> {
    s.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// CPF mod-11 checksum: weights 10..2 for the first check digit,
/// 11..2 for the second; remainder < 2 maps to 0. Sequences of one
/// repeated digit pass the arithmetic but are not valid CPFs.
fn is_valid_cpf(s: &str) -> bool {
    let d = digit_values(s);
    if d.len() != 11 {
        return false;
    }
    if d.iter().all(|&x| x == d[0]) {
        return false;
    }
    let check = |take: usize| -> u32 {
        let start = (take + 1) as u32;
        let sum: u32 = d[..take]
            .iter()
            .enumerate()
            .map(|(i, &x)| x * (start - i as u32))
            .sum();
        let rem = sum % 11;
        if rem < 2 { 0 } else { 11 - rem }
    };
    check(9) == d[9] && check(10) == d[10]
}

/// CNPJ mod-11 checksum: weights cycle 2..9 from the rightmost digit.
fn is_valid_cnpj(s: &str) -> bool {
    let d = digit_values(s);
    if d.len() != 14 {
        return false;
    }
    if d.iter().all(|&x| x == d[0]) {
        return false;
    }
    let check = |take: usize| -> u32 {
        let mut weight = 2;
        let mut sum = 0;
        for &x in d[..take].iter().rev() {
            sum += x * weight;
            weight += 1;
            if weight > 9 {
                weight = 2;
            }
        }
        let rem = sum % 11;
        if rem < 2 { 0 } else { 11 - rem }
    };
    check(12) == d[12] && check(13) == d[13]
}

/// 8-4-4-4-12 hexadecimal groups (a random PIX key)
fn is_uuid_shaped(s: &str) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    const LENS: [usize; 5] = [8, 4, 4, 4, 12];
    groups.len() == 5
        && groups
            .iter()
            .zip(LENS)
            .all(|(g, len)| g.len() == len && g.chars().all(|c| c.is_ascii_hexdigit()))
}
