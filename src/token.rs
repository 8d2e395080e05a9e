/// Associates readiness events with the source that produced them.
///
/// `Token` is an opaque value chosen by the caller and supplied to
/// [`Registry::register`]. Whenever the registered source produces a
/// readiness event, [`Event::token`] returns the very same value; the
/// library never interprets it. A common strategy is to use the token
/// as an index into a slab or map of connection state.
///
/// The wrapped integer is 64 bits wide on every target so that it
/// round-trips through the kernel's per-registration user-data word
/// without truncation.
///
/// # Examples
///
/// ```
/// use edge_net::Token;
///
/// let token = Token(7);
///
/// assert_eq!(token.0, 7);
/// assert_eq!(token, Token(7));
/// assert!(Token(1) < Token(2));
/// ```
///
/// [`Registry::register`]: struct.Registry.html#method.register
/// [`Event::token`]: struct.Event.html#method.token
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Token(pub u64);

impl From<Token> for u64 {
    #[inline]
    fn from(val: Token) -> u64 {
        val.0
    }
}

impl From<u64> for Token {
    #[inline]
    fn from(val: u64) -> Token {
        Token(val)
    }
}

#[cfg(test)]
mod test {
    use super::Token;
    use std::collections::HashMap;

    #[test]
    fn test_roundtrip() {
        let token = Token(u64::max_value());
        assert_eq!(u64::from(token), u64::max_value());
        assert_eq!(Token::from(u64::max_value()), token);
    }

    #[test]
    fn test_usable_as_map_key() {
        let mut map = HashMap::new();
        map.insert(Token(0), "listener");
        map.insert(Token(0xFFFF), "waker");

        assert_eq!(map.get(&Token(0xFFFF)), Some(&"waker"));
        assert_eq!(map.get(&Token(1)), None);
    }
}
