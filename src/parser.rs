//! Transcript extraction from the provider's HTML caption page.
//!
//! Only the text inside `<p>` elements is kept. Inline markup nested in a
//! paragraph is skipped but its text survives.

use crate::error::{Result, TalkSubError};

use std::borrow::Cow;
use std::sync::OnceLock;

use nom::bytes::complete::{tag, tag_no_case, take_until, take_while1};
use nom::character::complete::{char, satisfy};
use nom::combinator::{eof, map, peek, value};
use nom::error::{convert_error, VerboseError};
use nom::multi::many_till;
use nom::sequence::{delimited, terminated};
use nom::{branch::alt, Err, IResult};
use regex::{Captures, Regex};

/// Indentation the provider leaves between paragraphs.
const PARAGRAPH_ARTIFACT: &str = "\n\t\t\t";

pub fn render_plain_text(html: &str) -> Result<String> {
    let paragraphs = extract_paragraphs(html)?;
    if paragraphs.is_empty() {
        return Err(TalkSubError::NotFound(
            "transcript page contains no paragraphs".to_string(),
        ));
    }

    let mut out = String::new();
    for fragment in paragraphs.into_iter().flatten() {
        if fragment == PARAGRAPH_ARTIFACT {
            out.push_str("\n\n");
        } else if fragment.chars().all(|c| c == '\n' || c == '\t') {
            continue;
        } else {
            out.push_str(&decode_entities(fragment));
        }
    }
    Ok(out)
}

/// Returns the raw text fragments of every paragraph, in document order.
pub fn extract_paragraphs(html: &str) -> Result<Vec<Vec<&str>>> {
    let mut paragraphs = Vec::new();
    let mut input = html;

    while let Some(pos) = input.find('<') {
        input = &input[pos..];
        match paragraph_open(input) {
            Ok((rem_input, _)) => match paragraph_body(rem_input) {
                Ok((rem_input, fragments)) => {
                    paragraphs.push(fragments);
                    input = rem_input;
                }
                Err(Err::Error(err)) | Err(Err::Failure(err)) => {
                    let conv = convert_error(html, err);
                    return Err(TalkSubError::Parse(format!(
                        "Failed to parse transcript page: {}",
                        conv
                    )));
                }
                Err(Err::Incomplete(_)) => {
                    unreachable!("Incomplete data received by non-streaming parser.")
                }
            },
            Err(_) => input = &input[1..],
        }
    }

    Ok(paragraphs)
}

fn paragraph_open(input: &str) -> IResult<&str, (), VerboseError<&str>> {
    let (input, _) = tag_no_case("<p")(input)?;
    // `<pre>`, `<param>` and friends are not paragraphs.
    let (input, _) = peek(satisfy(|c| c == '>' || c == '/' || c.is_whitespace()))(input)?;
    let (input, _) = terminated(take_until(">"), char('>'))(input)?;
    Ok((input, ()))
}

fn paragraph_close(input: &str) -> IResult<&str, (), VerboseError<&str>> {
    let (input, _) = tag_no_case("</p")(input)?;
    let (input, _) = peek(satisfy(|c| c == '>' || c.is_whitespace()))(input)?;
    let (input, _) = terminated(take_until(">"), char('>'))(input)?;
    Ok((input, ()))
}

fn paragraph_body(input: &str) -> IResult<&str, Vec<&str>, VerboseError<&str>> {
    let text = map(take_while1(|c: char| c != '<'), Some);
    let inline_tag = value(None, delimited(tag("<"), take_until(">"), char('>')));
    let end = alt((paragraph_close, value((), eof)));

    let (input, (nodes, _)) = many_till(alt((text, inline_tag)), end)(input)?;

    Ok((input, nodes.into_iter().flatten().collect()))
}

fn decode_entities(text: &str) -> Cow<'_, str> {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    let entity = ENTITY.get_or_init(|| {
        Regex::new(r"&(amp|lt|gt|quot|apos|#[0-9]+|#[xX][0-9a-fA-F]+);").expect("valid entity regex")
    });

    entity.replace_all(text, |caps: &Captures| {
        let name = &caps[1];
        let decoded = match name {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ if name.starts_with("#x") || name.starts_with("#X") => {
                u32::from_str_radix(&name[2..], 16).ok().and_then(char::from_u32)
            }
            _ => name[1..].parse().ok().and_then(char::from_u32),
        };
        decoded.map_or_else(|| caps[0].to_string(), String::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_text_of_paragraphs_only() {
        let html = "<html><head><title>ignored</title></head><body>\
            <p>Hello <a href=\"#t=1\">there</a> world</p>\
            <div>not this</div><p class=\"x\">Second</p></body></html>";

        let paragraphs = extract_paragraphs(html).unwrap();

        assert_eq!(
            paragraphs,
            vec![vec!["Hello ", "there", " world"], vec!["Second"]]
        );
    }

    #[test]
    fn pre_is_not_a_paragraph() {
        let html = "<pre>code</pre><P>Text</P>";
        assert_eq!(extract_paragraphs(html).unwrap(), vec![vec!["Text"]]);
    }

    #[test]
    fn unterminated_paragraph_runs_to_end() {
        assert_eq!(extract_paragraphs("<p>dangling").unwrap(), vec![vec!["dangling"]]);
    }

    #[test]
    fn unclosed_inline_tag_is_a_parse_error() {
        let err = extract_paragraphs("<p>broken <a href").unwrap_err();
        assert!(matches!(err, TalkSubError::Parse(_)));
    }

    #[test]
    fn artifact_becomes_paragraph_break_and_whitespace_is_dropped() {
        let html = "<p><a>First.</a>\n<a>Still first.</a>\n\t\t\t<a>Second.</a>\t</p>";

        let text = render_plain_text(html).unwrap();

        assert_eq!(text, "First.Still first.\n\nSecond.");
    }

    #[test]
    fn entities_are_decoded() {
        let text = render_plain_text("<p>Tom &amp; Jerry &#39;&#x41;&quot; &bogus;</p>").unwrap();
        assert_eq!(text, "Tom & Jerry 'A\" &bogus;");
    }

    #[test]
    fn page_without_paragraphs_is_not_found() {
        let err = render_plain_text("<html><body>nothing</body></html>").unwrap_err();
        assert!(matches!(err, TalkSubError::NotFound(_)));
    }
}
