/// Joins socket contents into the persisted per-node string. Empty names are
/// empty slots.
pub fn encode_sockets<S: AsRef<str>>(items: &[S], delimiter: char) -> String {
    let mut output = String::new();
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            output.push(delimiter);
        }
        output.push_str(item.as_ref());
    }
    output
}

/// Splits a persisted socket string back into exactly `count` slots, padding
/// missing trailing slots as empty and ignoring any surplus.
pub fn decode_sockets(encoded: &str, delimiter: char, count: usize) -> Vec<String> {
    let mut output: Vec<String> = encoded
        .split(delimiter)
        .take(count)
        .map(str::to_string)
        .collect();
    output.resize(count, String::new());
    output
}
