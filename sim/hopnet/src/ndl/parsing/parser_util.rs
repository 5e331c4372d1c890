use super::parsing_data::*;
use nom::{
    branch::alt,
    bytes::complete::{escaped, tag, tag_no_case, take_until, take_while, take_while1},
    character::complete::{char, none_of},
    combinator::value,
    error::context,
    multi::many0,
    sequence::{delimited, preceded, separated_pair},
};

/// General parsing for any line of a topology file.
///
///
/// Takes in a line (without its leading tabs) and its line number.
/// Returns either an error string or a tuple containing the DecType it got and the Params it got inside of that DecType.
pub fn general_parser(s: &str, line_num: i32) -> Result<(DecType, Params), String> {
    // grab everything between brackets '[' and ']'
    let (remaining_string, parsed_string) =
        section(s).map_err(|e| format!("Line {line_num:?}: unable to find a section due to {e}\n"))?;

    if !remaining_string.trim().is_empty() {
        return Err(format!(
            "Line {line_num:?}: unexpected text after section '{}'\n",
            remaining_string.trim()
        ));
    }

    // parse what was inside of the section to get the type and remaining string
    let (rest, dectype) = get_type(parsed_string)
        .map_err(|e| format!("Line {line_num:?}: unknown declaration '{parsed_string}' due to {e}\n"))?;

    let mut args = Params::new();
    match arguments(rest) {
        Ok((extra, parsed)) => {
            if !extra.trim().is_empty() {
                return Err(format!(
                    "Line {line_num:?}: extra argument at '{}'\n",
                    extra.trim()
                ));
            }

            for (key, val) in parsed {
                // makes sure that each argument is a unique one, otherwise error
                if args.contains_key(key) {
                    return Err(format!(
                        "Line {line_num:?}: duplicate argument '{key}'='{val}'\n"
                    ));
                }

                args.insert(key.trim().to_string(), val.to_string());
            }
        }

        Err(e) => {
            return Err(format!(
                "Line {line_num:?}: unable to parse arguments at '{rest}' due to {e}\n"
            ));
        }
    }

    Ok((dectype, args))
}

/// Formats a general error message and returns that String.
pub fn general_error(line_num: i32, dec: DecType, msg: String) -> String {
    format!("Line {line_num:?}: Unable to parse inside of {dec:?} due to: \n\t{msg}")
}

/// Grabs the type from the beginning of each section in [general_parser].
/// For example, would turn "Router id='1'" into a dec type and the remainder of the string
fn get_type(input: &str) -> Res<&str, DecType> {
    context(
        "dectype",
        preceded(
            take_while(char::is_whitespace),
            alt((
                value(DecType::Topology, tag_no_case("Topology")),
                value(DecType::Links, tag_no_case("Links")),
                value(DecType::Router, tag_no_case("Router")),
                value(DecType::Row, tag_no_case("Row")),
                value(DecType::Network, tag_no_case("Network")),
            )),
        ),
    )(input)
}

/// Grabs everything between brackets "[]" in [general_parser].
fn section(input: &str) -> Res<&str, &str> {
    context("section", delimited(char('['), take_until("]"), char(']')))(input)
}

/// Breaks down the arguments of our input for the [general_parser].
/// For example, turns "id='1' ip='10.0.0.1'" into a vector of ("id", "1") and ("ip", "10.0.0.1")
fn arguments(input: &str) -> Res<&str, Vec<(&str, &str)>> {
    context(
        "arguments",
        many0(separated_pair(
            preceded(take_while1(char::is_whitespace), take_while1(is_key_char)),
            char('='),
            delimited(
                tag("'"),
                alt((escaped(none_of("\\\'"), '\\', tag("'")), tag(""))),
                tag("'"),
            ),
        )),
    )(input)
}

fn is_key_char(chr: char) -> bool {
    chr.is_ascii_alphanumeric() || chr == '-' || chr == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_section_with_arguments() {
        let (dectype, args) = general_parser("[Topology routers='4' capacity='20']", 1).unwrap();
        assert_eq!(dectype, DecType::Topology);
        assert_eq!(args.get("routers").map(String::as_str), Some("4"));
        assert_eq!(args.get("capacity").map(String::as_str), Some("20"));
    }

    #[test]
    fn parses_section_without_arguments() {
        let (dectype, args) = general_parser("[links]  ", 3).unwrap();
        assert_eq!(dectype, DecType::Links);
        assert!(args.is_empty());
    }

    #[test]
    fn router_is_not_row() {
        assert_eq!(general_parser("[Router id='2']", 1).unwrap().0, DecType::Router);
        assert_eq!(
            general_parser("[Row router='2' links='0 1']", 1).unwrap().0,
            DecType::Row
        );
    }

    #[test]
    fn rejects_duplicate_argument() {
        let err = general_parser("[Router id='1' id='2']", 7).unwrap_err();
        assert!(err.contains("Line 7: duplicate argument 'id'='2'"), "{err}");
    }

    #[test]
    fn rejects_unknown_type() {
        let err = general_parser("[Machine name='x']", 2).unwrap_err();
        assert!(err.starts_with("Line 2: unknown declaration"), "{err}");
    }

    #[test]
    fn rejects_trailing_text() {
        assert!(general_parser("[Links] extra", 1).is_err());
        assert!(general_parser("[Router id='1' stray]", 1).is_err());
        assert!(general_parser("Router id='1'", 1).is_err());
    }
}
