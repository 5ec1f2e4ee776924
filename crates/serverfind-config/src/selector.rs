//! Structural selectors for locating the sidebar in a host document.
//!
//! Supports the subset of CSS selector syntax the sidebar contract needs:
//! type selectors (`div`, `*`), classes (`.listItem`), ids (`#guilds`),
//! attribute presence and equality (`[data-dnd-name]`,
//! `[aria-label="Servers"]`), and the descendant (` `) and child (`>`)
//! combinators. Selectors live in config so a host page redesign only
//! touches the `[sidebar]` table.

use serverfind_common::ConfigError;

/// How two adjacent compound selectors relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`: `b` has some ancestor matching `a`.
    Descendant,
    /// `a > b`: `b`'s parent matches `a`.
    Child,
}

/// `[name]` or `[name="value"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFilter {
    pub name: String,
    pub value: Option<String>,
}

/// A run of simple selectors with no combinator, e.g. `div.item[data-x]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    /// Lowercased tag name; `None` for `*` or when omitted.
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeFilter>,
}

/// A parsed selector: `compounds[i]` and `compounds[i + 1]` are joined by
/// `combinators[i]`. Only [`parse_selector`] builds one, so there is always
/// at least one compound and exactly one fewer combinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
}

/// Read access to a node tree that selectors can be evaluated against.
pub trait SelectorTree {
    type Node: Copy;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    fn tag(&self, node: Self::Node) -> &str;
    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;
    fn has_class(&self, node: Self::Node, class: &str) -> bool;
}

impl Compound {
    pub fn matches<T: SelectorTree>(&self, tree: &T, node: T::Node) -> bool {
        if let Some(tag) = &self.tag {
            if !tree.tag(node).eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if tree.attribute(node, "id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| tree.has_class(node, c)) {
            return false;
        }
        self.attributes.iter().all(|f| match tree.attribute(node, &f.name) {
            None => false,
            Some(actual) => f.value.as_deref().map_or(true, |v| v == actual),
        })
    }
}

impl Selector {
    /// Whether `node` matches the whole selector. Ancestors are not limited
    /// to any scope, matching `querySelector` semantics.
    pub fn matches<T: SelectorTree>(&self, tree: &T, node: T::Node) -> bool {
        match self.compounds.len().checked_sub(1) {
            Some(last) => self.matches_from(tree, node, last),
            None => false,
        }
    }

    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    pub fn combinators(&self) -> &[Combinator] {
        &self.combinators
    }

    fn matches_from<T: SelectorTree>(&self, tree: &T, node: T::Node, index: usize) -> bool {
        if !self.compounds[index].matches(tree, node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => tree
                .parent(node)
                .is_some_and(|p| self.matches_from(tree, p, index - 1)),
            Combinator::Descendant => {
                let mut current = tree.parent(node);
                while let Some(ancestor) = current {
                    if self.matches_from(tree, ancestor, index - 1) {
                        return true;
                    }
                    current = tree.parent(ancestor);
                }
                false
            }
        }
    }
}

impl std::str::FromStr for Selector {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_selector(s)
    }
}

/// Parse a selector string.
pub fn parse_selector(input: &str) -> Result<Selector, ConfigError> {
    let mut scanner = Scanner::new(input);
    let invalid = |reason: String| ConfigError::ParseError(format!("invalid selector {input:?}: {reason}"));

    scanner.skip_whitespace();
    let mut compounds = vec![parse_compound(&mut scanner).map_err(invalid)?];
    let mut combinators = Vec::new();

    loop {
        let had_space = scanner.skip_whitespace();
        match scanner.peek() {
            None => break,
            Some('>') => {
                scanner.bump();
                scanner.skip_whitespace();
                combinators.push(Combinator::Child);
            }
            Some(_) if had_space => combinators.push(Combinator::Descendant),
            Some(c) => return Err(invalid(format!("unexpected '{c}'"))),
        }
        compounds.push(parse_compound(&mut scanner).map_err(invalid)?);
    }

    Ok(Selector {
        compounds,
        combinators,
    })
}

fn parse_compound(scanner: &mut Scanner) -> Result<Compound, String> {
    let mut compound = Compound::default();
    let mut seen_any = false;

    if scanner.peek() == Some('*') {
        scanner.bump();
        seen_any = true;
    } else {
        let tag = scanner.ident();
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
            seen_any = true;
        }
    }

    loop {
        match scanner.peek() {
            Some('.') => {
                scanner.bump();
                compound.classes.push(scanner.required_ident("class name")?);
            }
            Some('#') => {
                scanner.bump();
                compound.id = Some(scanner.required_ident("id")?);
            }
            Some('[') => {
                scanner.bump();
                compound.attributes.push(parse_attribute(scanner)?);
            }
            _ => break,
        }
        seen_any = true;
    }

    if seen_any {
        Ok(compound)
    } else {
        match scanner.peek() {
            Some(c) => Err(format!("unexpected '{c}'")),
            None => Err("expected a selector".into()),
        }
    }
}

fn parse_attribute(scanner: &mut Scanner) -> Result<AttributeFilter, String> {
    scanner.skip_whitespace();
    let name = scanner.required_ident("attribute name")?;
    scanner.skip_whitespace();

    let value = if scanner.peek() == Some('=') {
        scanner.bump();
        scanner.skip_whitespace();
        let value = match scanner.peek() {
            Some(quote @ ('"' | '\'')) => {
                scanner.bump();
                scanner.until(quote)?
            }
            _ => scanner.required_ident("attribute value")?,
        };
        scanner.skip_whitespace();
        Some(value)
    } else {
        None
    };

    match scanner.bump() {
        Some(']') => Ok(AttributeFilter { name, value }),
        Some(c) => Err(format!("expected ']' but found '{c}'")),
        None => Err("unterminated attribute selector".into()),
    }
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                out.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        out
    }

    fn required_ident(&mut self, what: &str) -> Result<String, String> {
        let ident = self.ident();
        if ident.is_empty() {
            Err(format!("expected {what}"))
        } else {
            Ok(ident)
        }
    }

    fn until(&mut self, end: char) -> Result<String, String> {
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == end => return Ok(out),
                Some(c) => out.push(c),
                None => return Err(format!("missing closing {end}")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attribute_equality() {
        let sel = parse_selector(r#"div[aria-label="Servers"]"#).unwrap();
        assert_eq!(sel.compounds.len(), 1);
        let c = &sel.compounds[0];
        assert_eq!(c.tag.as_deref(), Some("div"));
        assert_eq!(
            c.attributes,
            vec![AttributeFilter {
                name: "aria-label".into(),
                value: Some("Servers".into()),
            }]
        );
    }

    #[test]
    fn parsed_selectors_pair_compounds_with_combinators() {
        for input in ["div", "a b", "a > b c", r#"#guilds > [aria-label="Servers"] .x"#] {
            let sel = parse_selector(input).unwrap();
            assert!(!sel.compounds().is_empty(), "{input}");
            assert_eq!(sel.combinators().len(), sel.compounds().len() - 1, "{input}");
        }
    }

    #[test]
    fn parses_class_and_child_combinator() {
        let sel = parse_selector("div.listItem__650eb > div > div[data-dnd-name]").unwrap();
        assert_eq!(sel.compounds.len(), 3);
        assert_eq!(sel.combinators, vec![Combinator::Child, Combinator::Child]);
        assert_eq!(sel.compounds[0].classes, vec!["listItem__650eb".to_string()]);
        assert_eq!(sel.compounds[2].attributes[0].value, None);
    }

    #[test]
    fn parses_descendant_combinator() {
        let sel = parse_selector("nav   div.item").unwrap();
        assert_eq!(sel.combinators, vec![Combinator::Descendant]);
    }

    #[test]
    fn parses_universal_id_and_single_quotes() {
        let sel = parse_selector("*#guilds[role='tree']").unwrap();
        let c = &sel.compounds[0];
        assert_eq!(c.tag, None);
        assert_eq!(c.id.as_deref(), Some("guilds"));
        assert_eq!(c.attributes[0].value.as_deref(), Some("tree"));
    }

    #[test]
    fn tag_is_lowercased() {
        let sel: Selector = "DIV".parse().unwrap();
        assert_eq!(sel.compounds[0].tag.as_deref(), Some("div"));
    }

    #[test]
    fn rejects_malformed_selectors() {
        for bad in ["", "   ", "div >", "div[", "div[=x]", "div[a=\"x]", ".", "div,span", "> div"] {
            assert!(parse_selector(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn error_names_the_selector() {
        let err = parse_selector("div[").unwrap_err();
        assert!(err.to_string().contains("div["));
    }
}
