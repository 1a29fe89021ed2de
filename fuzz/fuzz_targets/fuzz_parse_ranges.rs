#![no_main]
use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let Some(date) = NaiveDate::from_ymd_opt(2024, 1, 1) else {
        return;
    };

    // Arbitrary portal strings must never panic and always come back sorted
    let events = cez_hdo::schedule::parse_ranges(&text, date);
    assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert!(events.len() % 2 == 0);
});
