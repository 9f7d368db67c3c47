/// Splits a text into an ordered sequence of whitespace-delimited tokens.
///
/// Tokens are split on whitespace runs; no normalization (case,
/// punctuation) is performed. The total token count is the length of the
/// returned vector. Empty input yields an empty vector.
pub fn tokenize(text: &str) -> Vec<String> {
	text.split_whitespace().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splits_on_whitespace_runs() {
		let words = tokenize("the  quick\tbrown\n fox");
		assert_eq!(words, vec!["the", "quick", "brown", "fox"]);
	}

	#[test]
	fn keeps_case_and_punctuation() {
		let words = tokenize("Hello, World!");
		assert_eq!(words, vec!["Hello,", "World!"]);
	}

	#[test]
	fn empty_input_yields_no_tokens() {
		assert!(tokenize("").is_empty());
		assert!(tokenize("   \n\t ").is_empty());
	}
}
