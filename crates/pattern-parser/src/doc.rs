//! Documentation comment parsing.

use nom::{
    bytes::complete::take_while1, character::complete::char, sequence::preceded, IResult,
};
use pattern_core::{DocComment, DocTag};

fn tag_name(input: &str) -> IResult<&str, &str> {
    preceded(
        char('@'),
        take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-'),
    )(input)
}

/// Split the body of a `/** ... */` comment into free text and `@tag` entries.
pub fn parse_doc_comment(body: &str) -> DocComment {
    let mut doc = DocComment::default();

    for raw in body.lines() {
        let line = raw.trim();
        let line = line.strip_prefix('*').unwrap_or(line).trim();

        if let Ok((rest, name)) = tag_name(line) {
            doc.tags.push(DocTag {
                name: name.to_string(),
                text: rest.trim().to_string(),
            });
            continue;
        }

        if line.is_empty() {
            continue;
        }

        let target = match doc.tags.last_mut() {
            Some(tag) => &mut tag.text,
            None => &mut doc.text,
        };
        if !target.is_empty() {
            target.push(' ');
        }
        target.push_str(line);
    }

    doc
}
