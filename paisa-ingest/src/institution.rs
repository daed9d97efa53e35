//! Bank / UPI-app identification from sender ids and message text.

use paisa_core::Institution;

/// Ordered identifier table: banks first, then UPI apps. First substring
/// hit wins, so a message naming two institutions resolves to whichever
/// is declared earlier.
/// Identifiers are stored uppercase; the probe text is uppercased before
/// the scan.
const IDENTIFIERS: &[(Institution, &[&str])] = &[
    (Institution::Sbi, &["SBI", "SBIUPI", "STATE BANK"]),
    (Institution::Hdfc, &["HDFC", "HDFCBK", "HDFCBANK"]),
    (Institution::Icici, &["ICICI", "ICICIBK", "ICICIBANK"]),
    (Institution::Axis, &["AXIS", "AXISBK", "AXISBANK"]),
    (Institution::Pnb, &["PNB", "PNBBK", "PUNJAB NATIONAL"]),
    (Institution::Bob, &["BOB", "BOBBANK", "BANK OF BARODA"]),
    (Institution::Canara, &["CANARA", "CANARABK", "CANARA BANK"]),
    (Institution::Union, &["UNION", "UNIONBK", "UNION BANK"]),
    (Institution::Kotak, &["KOTAK", "KOTAKBK", "KOTAK MAHINDRA"]),
    (Institution::Gpay, &["GOOGLE PAY", "GPAY", "G PAY"]),
    (Institution::PhonePe, &["PHONEPE"]),
    (Institution::Paytm, &["PAYTM"]),
    (Institution::Bhim, &["BHIM", "BHIMUPI"]),
    (Institution::AmazonPay, &["AMAZON PAY", "AMAZONPAY"]),
    (Institution::Mobikwik, &["MOBIKWIK"]),
];

/// Identify the originating institution from body + sender.
pub fn identify(body: &str, sender: &str) -> Institution {
    let combined = format!("{body} {sender}").to_uppercase();

    for (institution, ids) in IDENTIFIERS {
        if ids.iter().any(|id| combined.contains(id)) {
            return *institution;
        }
    }

    Institution::Unknown
}
