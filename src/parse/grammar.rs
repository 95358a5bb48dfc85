use winnow::ascii::{dec_int, till_line_ending};
use winnow::combinator::{alt, cut_err, eof, opt, repeat};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::{Combine, DataTypeKey, GroupDefinition, MemberType, SiteKey};

use super::parser::ParsedCatalog;

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

// -- Tokens -----------------------------------------------------------------

fn keyword<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_').parse_next(input)
}

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn string_arg(input: &mut &str) -> ModalResult<String> {
    ws.parse_next(input)?;
    cut_err(string_literal)
        .context(StrContext::Expected(StrContextValue::Description(
            "quoted string",
        )))
        .parse_next(input)
}

fn key_arg(input: &mut &str) -> ModalResult<i64> {
    ws.parse_next(input)?;
    cut_err(dec_int::<_, i64, _>)
        .context(StrContext::Expected(StrContextValue::Description(
            "integer key",
        )))
        .parse_next(input)
}

// -- Statements -------------------------------------------------------------

#[derive(Debug)]
enum Statement {
    Description(String),
    Site(i64),
    DataType(i64, String),
    Member(MemberType, String),
    TsMember(String),
    Subgroup(String, Combine),
}

fn combine_code(input: &mut &str) -> ModalResult<Combine> {
    ws.parse_next(input)?;
    cut_err(any.verify(char::is_ascii_alphabetic))
        .context(StrContext::Expected(StrContextValue::Description(
            "combine code",
        )))
        .map(Combine::from_code)
        .parse_next(input)
}

fn statement(input: &mut &str) -> ModalResult<Statement> {
    let checkpoint = input.checkpoint();
    let word = keyword.parse_next(input)?;
    let stmt = match word.to_ascii_lowercase().as_str() {
        "description" => Statement::Description(string_arg(input)?),
        "site" => Statement::Site(key_arg(input)?),
        "datatype" => {
            let key = key_arg(input)?;
            Statement::DataType(key, string_arg(input)?)
        }
        "tsid" => Statement::TsMember(string_arg(input)?),
        "include" => Statement::Subgroup(string_arg(input)?, Combine::Include),
        "exclude" => Statement::Subgroup(string_arg(input)?, Combine::Exclude),
        "intersect" => Statement::Subgroup(string_arg(input)?, Combine::Intersect),
        "subgroup" => {
            let name = string_arg(input)?;
            Statement::Subgroup(name, combine_code(input)?)
        }
        other => match other.parse::<MemberType>() {
            Ok(member_type) => Statement::Member(member_type, string_arg(input)?),
            Err(_) => {
                input.reset(&checkpoint);
                return Err(ErrMode::from_input(input));
            }
        },
    };
    Ok(stmt)
}

fn apply(group: &mut GroupDefinition, stmt: Statement) {
    match stmt {
        Statement::Description(text) => group.set_description(text),
        Statement::Site(key) => group.add_site_id(SiteKey(key)),
        Statement::DataType(key, code) => group.add_data_type(DataTypeKey(key), code),
        Statement::Member(member_type, value) => group.add_member(member_type, value),
        Statement::TsMember(path) => group.add_ts_member(path),
        Statement::Subgroup(name, combine) => group.add_subgroup(name, combine),
    }
}

// -- Group definitions ------------------------------------------------------

fn group_def(input: &mut &str) -> ModalResult<GroupDefinition> {
    ws.parse_next(input)?;
    "group".parse_next(input)?;

    let name = string_arg
        .context(StrContext::Expected(StrContextValue::Description(
            "group name",
        )))
        .parse_next(input)?;
    let mut group = GroupDefinition::new(name);

    ws.parse_next(input)?;
    cut_err('{').parse_next(input)?;

    loop {
        ws.parse_next(input)?;
        if opt('}').parse_next(input)?.is_some() {
            return Ok(group);
        }
        let stmt = cut_err(statement)
            .context(StrContext::Expected(StrContextValue::Description(
                "group statement",
            )))
            .parse_next(input)?;
        apply(&mut group, stmt);
    }
}

// -- Top-level parser -------------------------------------------------------

pub fn parse_catalog(input: &mut &str) -> ModalResult<ParsedCatalog> {
    let groups: Vec<GroupDefinition> = repeat(0.., group_def).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(eof)
        .context(StrContext::Expected(StrContextValue::StringLiteral("group")))
        .parse_next(input)?;
    Ok(ParsedCatalog { groups })
}
