/// A fixed-length ordered window of tokens used as a chain lookup key.
///
/// The window is mutated in place during a traversal by shifting out the
/// oldest token and appending the newest; it has no persistence beyond
/// the active traversal.
///
/// ## Invariants
/// - The window length is constant for the lifetime of the value.
/// - Two prefixes are equal iff their token sequences and order are equal.
///
/// ## Notes
/// The canonical key joins tokens with a single space. A token containing
/// that delimiter would collide with a multi-token prefix; tokens come
/// from whitespace splitting so none can, but the approximation is
/// accepted rather than escaped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Prefix {
	tokens: Vec<String>,
}

impl Prefix {
	/// Creates a window of `len` empty-string tokens.
	pub(crate) fn new(len: usize) -> Self {
		Self { tokens: vec![String::new(); len] }
	}

	/// Reconstructs a window from a canonical key.
	///
	/// Missing leading tokens (a key shorter than `len`) are padded with
	/// empty strings, mirroring a freshly seeded window.
	pub(crate) fn from_key(key: &str, len: usize) -> Self {
		let mut prefix = Self::new(len);
		for token in key.split(' ').filter(|t| !t.is_empty()) {
			prefix.shift(token);
		}
		prefix
	}

	/// Returns the canonical string key (tokens joined by one space).
	pub(crate) fn key(&self) -> String {
		self.tokens.join(" ")
	}

	/// Drops the oldest token and appends `token`, preserving length.
	pub(crate) fn shift(&mut self, token: &str) {
		self.tokens.rotate_left(1);
		if let Some(last) = self.tokens.last_mut() {
			*last = token.to_owned();
		}
	}
}
