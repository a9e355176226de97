//! Tokens and token pairs
//!
//! A token is an immutable pair of attributes (color, icon) plus display
//! flags. Tokens are identified by a stable id: two tokens with identical
//! attributes are attribute-equal but remain distinct board entities, so
//! every containment and replacement operation keys on the id.
//!
//! Matching rules:
//!
//! - **Full match**: both attributes equal.
//! - **Partial match**: not a full match, and exactly one attribute equal.
//! - **Conversion**: a partial-match pair implies a unique full-match token:
//!   keep the shared attribute and take the third value of the mismatched
//!   one (with 3 values per attribute, exactly one remains).

/// Token color attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenColor {
    Blue,
    Gray,
    Red,
}

impl TokenColor {
    pub const ALL: [TokenColor; 3] = [TokenColor::Blue, TokenColor::Gray, TokenColor::Red];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenColor::Blue => "blue",
            TokenColor::Gray => "gray",
            TokenColor::Red => "red",
        }
    }
}

/// Token icon attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenIcon {
    Die,
    Face,
    Star,
}

impl TokenIcon {
    pub const ALL: [TokenIcon; 3] = [TokenIcon::Die, TokenIcon::Face, TokenIcon::Star];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenIcon::Die => "die",
            TokenIcon::Face => "face",
            TokenIcon::Star => "star",
        }
    }
}

/// Stable identity of a token instance on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(pub u32);

/// The value half of a token: the (color, icon) combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attributes {
    pub color: TokenColor,
    pub icon: TokenIcon,
}

impl Attributes {
    pub fn new(color: TokenColor, icon: TokenIcon) -> Self {
        Self { color, icon }
    }

    /// Both attributes equal
    pub fn is_full_match(&self, other: &Attributes) -> bool {
        self == other
    }

    /// Exactly one attribute equal (and therefore not a full match)
    pub fn is_partial_match(&self, other: &Attributes) -> bool {
        !self.is_full_match(other) && (self.color == other.color || self.icon == other.icon)
    }

    /// The full-match combination implied by a partial-match pair
    ///
    /// Keeps the shared attribute and picks the third value of the
    /// mismatched one. Returns `None` unless the pair is a partial match.
    pub fn converted_with(&self, other: &Attributes) -> Option<Attributes> {
        if !self.is_partial_match(other) {
            return None;
        }
        if self.color == other.color {
            let icon = Self::third_icon(self.icon, other.icon)?;
            Some(Attributes::new(self.color, icon))
        } else {
            let color = Self::third_color(self.color, other.color)?;
            Some(Attributes::new(color, self.icon))
        }
    }

    fn third_color(a: TokenColor, b: TokenColor) -> Option<TokenColor> {
        TokenColor::ALL.into_iter().find(|&c| c != a && c != b)
    }

    fn third_icon(a: TokenIcon, b: TokenIcon) -> Option<TokenIcon> {
        TokenIcon::ALL.into_iter().find(|&i| i != a && i != b)
    }

    /// All 9 attribute combinations
    pub fn all() -> impl Iterator<Item = Attributes> {
        TokenColor::ALL.into_iter().flat_map(|color| {
            TokenIcon::ALL
                .into_iter()
                .map(move |icon| Attributes::new(color, icon))
        })
    }
}

/// A token instance: attributes plus gameplay display flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub id: TokenId,
    pub attributes: Attributes,
    /// Rendered distinctly; matching rules ignore this flag
    pub is_wildcard: bool,
    /// Highlighted in training mode to point at the key sequence
    pub shows_training_hint: bool,
}

impl Token {
    pub fn new(id: TokenId, attributes: Attributes) -> Self {
        Self {
            id,
            attributes,
            is_wildcard: false,
            shows_training_hint: false,
        }
    }

    pub fn color(&self) -> TokenColor {
        self.attributes.color
    }

    pub fn icon(&self) -> TokenIcon {
        self.attributes.icon
    }
}

/// A transient relation between two tokens, always derived, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPair {
    pub token1: Token,
    pub token2: Token,
}

impl TokenPair {
    pub fn new(token1: Token, token2: Token) -> Self {
        Self { token1, token2 }
    }

    pub fn is_partial_match(&self) -> bool {
        self.token1.attributes.is_partial_match(&self.token2.attributes)
    }

    /// The full-match attributes this pair converts to, if it is a partial match
    pub fn converted(&self) -> Option<Attributes> {
        self.token1.attributes.converted_with(&self.token2.attributes)
    }

    /// Whether converting this pair yields the target's attributes
    ///
    /// True iff the pair itself and each token individually paired with the
    /// target are all partial matches; that guarantees the conversion result
    /// without materializing it.
    pub fn can_convert_to(&self, target: Option<&Token>) -> bool {
        let Some(target) = target else {
            return false;
        };
        self.is_partial_match()
            && target.attributes.is_partial_match(&self.token1.attributes)
            && target.attributes.is_partial_match(&self.token2.attributes)
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.token1.id == id || self.token2.id == id
    }
}
