/// Recover a JSON object from raw model output.
///
/// Generation models routinely wrap JSON in prose or markdown fences despite
/// instructions, so this is deliberately tolerant: strip fence markers, slice
/// from the first `{` to the last `}` inclusive, trim. Returns the literal
/// `"{}"` when no brace pair exists. Never fails; parsing the result (and
/// treating parse failure as its own error) is the caller's job.
pub fn extract_json(raw: &str) -> String {
    let defenced = raw.replace("```json", "").replace("```", "");

    let start = defenced.find('{');
    let end = defenced.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start <= end => defenced[start..=end].trim().to_string(),
        _ => "{}".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_markdown_fences() {
        let raw = "Here you go:\n```json\n{\"a\":1}\n```\nEnjoy!";
        assert_eq!(extract_json(raw), "{\"a\":1}");
    }

    #[test]
    fn passes_bare_json_through() {
        assert_eq!(extract_json("{\"ok\": true}"), "{\"ok\": true}");
    }

    #[test]
    fn slices_between_outermost_braces() {
        let raw = "The paper follows. {\"questions\": [{\"marks\": 4}]} Good luck!";
        assert_eq!(extract_json(raw), "{\"questions\": [{\"marks\": 4}]}");
    }

    #[test]
    fn no_braces_yields_empty_object() {
        assert_eq!(extract_json("no braces here"), "{}");
        assert_eq!(extract_json(""), "{}");
    }

    #[test]
    fn mismatched_braces_yield_empty_object() {
        assert_eq!(extract_json("} backwards {"), "{}");
    }
}
