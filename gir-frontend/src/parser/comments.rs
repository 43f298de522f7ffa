//! Comment grouping and attachment
//!
//! Comments are removed from the parser's token stream and collected into
//! groups: adjacent comments separated by at most one line break. A group
//! that starts on the line of the preceding token only extends along that
//! line, and is that token's *line comment*. A group ending on the line
//! right before a token is that token's *lead comment* (its doc).

use crate::ast::{Comment, CommentGroup};
use crate::lexer::{Token, TokenType};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub(crate) struct CommentTable {
    /// Every group, in source order
    pub(crate) groups: Vec<CommentGroup>,
    lead: HashMap<usize, CommentGroup>,
    line: HashMap<usize, CommentGroup>,
}

impl CommentTable {
    pub(crate) fn lead_comment(&self, token_index: usize) -> Option<CommentGroup> {
        self.lead.get(&token_index).cloned()
    }

    pub(crate) fn line_comment(&self, token_index: usize) -> Option<CommentGroup> {
        self.line.get(&token_index).cloned()
    }
}

fn to_comment(token: &Token) -> Comment {
    Comment {
        text: token.token_type.to_string(),
        position: token.span.start.clone(),
    }
}

/// Split `tokens` into the parser stream and the comment table.
///
/// Implicit semicolons stay in the stream but are transparent for comment
/// attachment: a comment's neighbours are the closest real tokens.
pub(crate) fn split_comments(tokens: Vec<Token>) -> (Vec<Token>, CommentTable) {
    let mut stream: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut table = CommentTable::default();
    let mut pending: Vec<Token> = Vec::new();
    let mut last_real: Option<usize> = None;

    for token in tokens {
        if matches!(token.token_type, TokenType::Comment(_)) {
            pending.push(token);
            continue;
        }
        if token.is_implicit() {
            stream.push(token);
            continue;
        }

        let next_index = stream.len();
        if !pending.is_empty() {
            attach(
                &mut table,
                std::mem::take(&mut pending),
                last_real.map(|i| (i, &stream[i])),
                (next_index, &token),
            );
        }
        stream.push(token);
        last_real = Some(next_index);
    }

    (stream, table)
}

fn attach(
    table: &mut CommentTable,
    pending: Vec<Token>,
    prev: Option<(usize, &Token)>,
    next: (usize, &Token),
) {
    let (next_index, next_token) = next;
    let next_line = next_token.span.start.line;
    let mut cursor = 0;

    if let Some((prev_index, prev_token)) = prev {
        if pending[0].span.start.line == prev_token.span.end.line {
            let mut end_line = pending[0].span.end.line;
            let mut list = vec![to_comment(&pending[0])];
            cursor = 1;
            while cursor < pending.len() && pending[cursor].span.start.line <= end_line {
                end_line = pending[cursor].span.end.line;
                list.push(to_comment(&pending[cursor]));
                cursor += 1;
            }
            let group = CommentGroup { list };
            let closes_line = cursor < pending.len()
                || next_line != end_line
                || matches!(
                    next_token.token_type,
                    TokenType::Semicolon | TokenType::EndOfFile
                );
            if closes_line {
                table.line.insert(prev_index, group.clone());
            }
            table.groups.push(group);
        }
    }

    let mut last: Option<(CommentGroup, i64)> = None;
    while cursor < pending.len() {
        let mut end_line = pending[cursor].span.end.line;
        let mut list = vec![to_comment(&pending[cursor])];
        cursor += 1;
        while cursor < pending.len() && pending[cursor].span.start.line <= end_line + 1 {
            end_line = pending[cursor].span.end.line;
            list.push(to_comment(&pending[cursor]));
            cursor += 1;
        }
        let group = CommentGroup { list };
        table.groups.push(group.clone());
        last = Some((group, end_line));
    }

    if let Some((group, end_line)) = last {
        if end_line + 1 == next_line {
            table.lead.insert(next_index, group);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn table(source: &str) -> (Vec<Token>, CommentTable) {
        let tokens = Lexer::new(source, "c.go").tokenize().unwrap();
        split_comments(tokens)
    }

    fn index_of(stream: &[Token], name: &str) -> usize {
        stream
            .iter()
            .position(|t| t.token_type == TokenType::Identifier(name.to_string()))
            .unwrap()
    }

    #[test]
    fn test_lead_comment() {
        let (stream, table) = table("// First\n// Second\nfoo\n");
        let lead = table.lead_comment(index_of(&stream, "foo")).unwrap();
        assert_eq!(lead.texts(), vec!["// First", "// Second"]);
        assert_eq!(table.groups.len(), 1);
    }

    #[test]
    fn test_blank_line_splits_groups() {
        let (stream, table) = table("// a\n\n// b\nfoo\n");
        assert_eq!(table.groups.len(), 2);
        let lead = table.lead_comment(index_of(&stream, "foo")).unwrap();
        assert_eq!(lead.texts(), vec!["// b"]);
    }

    #[test]
    fn test_detached_comment_is_not_lead() {
        let (stream, table) = table("// a\n\nfoo\n");
        assert!(table.lead_comment(index_of(&stream, "foo")).is_none());
        assert_eq!(table.groups.len(), 1);
    }

    #[test]
    fn test_line_comment_separate_from_lead() {
        let (stream, table) = table("foo // trailing\n// next\nbar\n");
        let line = table.line_comment(index_of(&stream, "foo")).unwrap();
        assert_eq!(line.texts(), vec!["// trailing"]);
        let lead = table.lead_comment(index_of(&stream, "bar")).unwrap();
        assert_eq!(lead.texts(), vec!["// next"]);
    }

    #[test]
    fn test_comments_removed_from_stream() {
        let (stream, _) = table("a /* x */ b");
        assert!(stream
            .iter()
            .all(|t| !matches!(t.token_type, TokenType::Comment(_))));
    }
}
