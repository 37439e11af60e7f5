//! Static element-class tables used by the balancer.
//!
//! Containment is modeled as a small closed set of content groups: each
//! element is a member of some groups and may contain some groups. The
//! balancer auto-closes an open element when the incoming tag's membership
//! does not intersect what the open element may contain. Scope flags stop an
//! explicit end tag from closing through an unrelated ancestor.
//!
//! The tables are deliberately HTML4-flavored; full HTML5 tree construction
//! (insertion modes, foster parenting) is out of scope. They only need to be
//! faithful for the dangerous subset: implied end tags and scoped matching.

/// Bit set of content groups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct GroupSet(u32);

impl GroupSet {
    pub(crate) const EMPTY: GroupSet = GroupSet(0);
    pub(crate) const BLOCK: GroupSet = GroupSet(1 << 0);
    pub(crate) const INLINE: GroupSet = GroupSet(1 << 1);
    /// Direct content of `table` and its sections: caption, colgroup, col,
    /// thead, tbody, tfoot, tr.
    pub(crate) const TABLE_CONTENT: GroupSet = GroupSet(1 << 2);
    /// `td` and `th`.
    pub(crate) const CELL: GroupSet = GroupSet(1 << 3);
    /// `li`.
    pub(crate) const LIST_ITEM: GroupSet = GroupSet(1 << 4);
    /// `dt` and `dd`.
    pub(crate) const DL_ITEM: GroupSet = GroupSet(1 << 5);
    /// `option` and `optgroup`.
    pub(crate) const OPTION: GroupSet = GroupSet(1 << 6);

    pub(crate) const FLOW: GroupSet = GroupSet(Self::BLOCK.0 | Self::INLINE.0);

    pub(crate) const fn union(self, other: GroupSet) -> GroupSet {
        GroupSet(self.0 | other.0)
    }

    pub(crate) const fn intersects(self, other: GroupSet) -> bool {
        self.0 & other.0 != 0
    }
}

/// Bit set of scopes an open element establishes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ScopeSet(u8);

impl ScopeSet {
    pub(crate) const EMPTY: ScopeSet = ScopeSet(0);
    /// Baseline "in scope" barrier: table, td, th, caption, applet, marquee,
    /// object.
    pub(crate) const COMMON: ScopeSet = ScopeSet(1 << 0);
    pub(crate) const BUTTON: ScopeSet = ScopeSet(1 << 1);
    pub(crate) const LIST_ITEM: ScopeSet = ScopeSet(1 << 2);
    pub(crate) const TABLE: ScopeSet = ScopeSet(1 << 3);

    pub(crate) const fn union(self, other: ScopeSet) -> ScopeSet {
        ScopeSet(self.0 | other.0)
    }

    /// True when every scope in `other` is also in `self`.
    pub(crate) const fn contains_all(self, other: ScopeSet) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Groups the named element is a member of. Unknown elements are treated as
/// inline so the containment rules stay permissive for custom elements.
pub(crate) fn member_groups(name: &str) -> GroupSet {
    match name {
        "address" | "article" | "aside" | "blockquote" | "details" | "dialog" | "div" | "dl"
        | "fieldset" | "figcaption" | "figure" | "footer" | "form" | "h1" | "h2" | "h3" | "h4"
        | "h5" | "h6" | "header" | "hr" | "main" | "nav" | "ol" | "p" | "pre" | "section"
        | "summary" | "table" | "ul" => GroupSet::BLOCK,
        "li" => GroupSet::LIST_ITEM,
        "dd" | "dt" => GroupSet::DL_ITEM,
        "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr" => {
            GroupSet::TABLE_CONTENT
        }
        "td" | "th" => GroupSet::CELL,
        "optgroup" | "option" => GroupSet::OPTION,
        _ => GroupSet::INLINE,
    }
}

/// Groups the named element may directly contain. Unknown elements get the
/// phrasing-only model: a browser closes `p` and friends through them when a
/// block arrives, so treating them as block containers would let output
/// re-parse into a different tree.
pub(crate) fn containable_groups(name: &str) -> GroupSet {
    match name {
        // Flow containers.
        "article" | "aside" | "blockquote" | "details" | "dialog" | "div" | "fieldset"
        | "figcaption" | "figure" | "footer" | "form" | "header" | "main" | "nav" | "section"
        | "summary" | "body" => GroupSet::FLOW,
        // Phrasing-only containers; opening a block inside one closes it.
        "address" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" | "pre" => GroupSet::INLINE,
        "ul" | "ol" => GroupSet::LIST_ITEM,
        "li" | "dd" | "dt" => GroupSet::FLOW,
        "dl" => GroupSet::DL_ITEM,
        "table" => GroupSet::TABLE_CONTENT,
        "thead" | "tbody" | "tfoot" | "colgroup" => GroupSet::TABLE_CONTENT,
        "tr" => GroupSet::CELL,
        "td" | "th" | "caption" => GroupSet::FLOW,
        "select" | "optgroup" => GroupSet::OPTION,
        // Text-only or empty content models.
        "option" | "iframe" | "script" | "style" | "textarea" | "title" | "xmp" => GroupSet::EMPTY,
        name if is_void(name) => GroupSet::EMPTY,
        _ => GroupSet::INLINE,
    }
}

/// Scopes the named open element establishes.
pub(crate) fn established_scopes(name: &str) -> ScopeSet {
    match name {
        "table" => ScopeSet::COMMON.union(ScopeSet::TABLE),
        "td" | "th" | "caption" | "applet" | "marquee" | "object" => ScopeSet::COMMON,
        "button" => ScopeSet::BUTTON,
        "ol" | "ul" => ScopeSet::LIST_ITEM,
        _ => ScopeSet::EMPTY,
    }
}

/// The single implied block-container child, used to synthesize a wrapper
/// when content appears directly inside an element that cannot hold it
/// (`<table><td>` becomes `<table><tr><td>`).
pub(crate) fn implied_child(name: &str) -> Option<&'static str> {
    match name {
        "ul" | "ol" => Some("li"),
        "dl" => Some("dd"),
        "table" | "thead" | "tbody" | "tfoot" => Some("tr"),
        "tr" => Some("td"),
        "select" => Some("option"),
        _ => None,
    }
}

/// Void elements cannot have children or a close tag.
pub(crate) fn is_void(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Special elements are lexed whole: their body is raw text up to the
/// case-insensitive matching close tag, never nested markup.
pub(crate) fn is_special(name: &str) -> bool {
    matches!(
        name,
        "iframe" | "script" | "style" | "textarea" | "title" | "xmp"
    )
}

/// Special elements whose body is executable code rather than text. When the
/// element itself is rejected the body is dropped instead of being kept as
/// escaped text.
pub(crate) fn is_code_special(name: &str) -> bool {
    matches!(name, "script" | "style")
}

/// `h1`-`h6` form one equivalence class for end-tag matching.
pub(crate) fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}
