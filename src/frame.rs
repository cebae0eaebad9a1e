/// Messages sent one at a time during the echo phase, in this order.
pub const TEST_MESSAGES: [&[u8]; 4] = [
    b"Hello STM32!\r\n",
    b"Test Message 1\r\n",
    b"Test Message 2\r\n",
    b"Serial Bridge Test\r\n",
];

pub const PERF_PHRASE: &[u8] = b"Performance test data ";
pub const PERF_REPEAT: usize = 10;

/// Payload for the throughput loop: the phrase repeated, then CRLF.
pub fn perf_payload() -> Vec<u8> {
    let mut out = Vec::with_capacity(PERF_PHRASE.len() * PERF_REPEAT + 2);
    for _ in 0..PERF_REPEAT {
        out.extend_from_slice(PERF_PHRASE);
    }
    out.extend_from_slice(b"\r\n");
    out
}

/// Best-effort text for console output: invalid UTF-8 is dropped, surrounding
/// whitespace trimmed.
pub fn display_text(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        s.push_str(chunk.valid());
    }
    s.trim().to_string()
}
