use clap::clap_app;
use tree_match::demo::{default_rules,labelled,run,trees,FALLBACK_LABEL};
use tree_match::matcher::dispatch::MatchError;
use tree_match::matcher::parse::{parse_rule,ParseError};
use tree_match::matcher::pattern::Pattern;
use tree_match::tree::sref::RefError;

#[derive(Debug)]
pub struct ProcessingError {
    context: String,
    typ: ErrorType,
}

#[derive(Debug)]
pub enum ErrorType {
    Match(MatchError),
    Ref(RefError),
    Parse(ParseError),
    Unexpected,
}

impl ErrorType {
    fn nowhere(self) -> ProcessingError {
        ProcessingError {
            context: String::new(),
            typ: self
        }
    }
    fn at(self, column: usize, text: &str) -> ProcessingError {
        ProcessingError {
            context: format!("{} (column {})", text, column + 1),
            typ: self
        }
    }
}

impl From<RefError> for ProcessingError {
    fn from(e: RefError) -> Self {
        ErrorType::Ref(e).nowhere()
    }
}

impl From<MatchError> for ProcessingError {
    fn from(e: MatchError) -> Self {
        match e {
            MatchError::Ref(r) => r.into(),
            e => ErrorType::Match(e).nowhere(),
        }
    }
}

impl From<log::SetLoggerError> for ProcessingError {
    fn from(_: log::SetLoggerError) -> Self {
        ErrorType::Unexpected.nowhere()
    }
}

/// Rules given with `-r`, or the default table when there are none.
fn parse_rules<'a>(texts: Option<impl Iterator<Item=&'a str>>) -> Result<Vec<(Pattern,String)>,ProcessingError> {
    match texts {
        None => Ok(default_rules()),
        Some(texts) => texts
            .map(|text| parse_rule(text).map_err(|e| {
                let column = e.column(text);
                ErrorType::Parse(e).at(column, text)
            }))
            .collect()
    }
}

fn main() -> Result<(),ProcessingError> {
    let matches = clap_app!(tree_match =>
            (version: "0.1")
            (about: "Dispatches a set of sample trees through a rule table ordered by specificity")
            (@arg RULE: -r --rule +takes_value +multiple "Rule written PATTERN=LABEL, e.g. 'Mem(Mem(_))=Mem of Mem!'. Replaces the default rules")
            (@arg FALLBACK: -f --fallback +takes_value "Label printed by the fallback rule")
            (@arg BARE: --bare "Register no fallback rule")
            (@arg DUMP: --dump "Print the rule table in dispatch order instead of dispatching")
            (@arg QUIET: -q "Disables logging output")
            (@arg VERBOSITY: -v +multiple "Set verbosity level of logging")
    ).get_matches();

    stderrlog::new()
        .module(module_path!())
        .quiet(matches.is_present("QUIET"))
        .verbosity(matches.occurrences_of("VERBOSITY") as usize)
        .timestamp(stderrlog::Timestamp::Millisecond)
        .init()?;

    let rules = parse_rules(matches.values_of("RULE"))?;
    let fallback = if matches.is_present("BARE") {
        None
    } else {
        Some(matches.value_of("FALLBACK").unwrap_or(FALLBACK_LABEL).to_string())
    };
    let matcher = labelled(rules, fallback);

    if matches.is_present("DUMP") {
        print!("{}", matcher.dump());
    } else {
        for line in run(&matcher, &trees())? {
            println!("{}", line);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use tree_match::tree::ast::NodeKind;
    use super::*;

    fn rules(texts: &[&'static str]) -> Result<Vec<(Pattern,String)>,ProcessingError> {
        parse_rules(Some(texts.iter().cloned()))
    }

    #[test]
    fn no_rules_means_default_table() {
        let none: Option<std::vec::IntoIter<&str>> = None;
        assert_eq!(parse_rules(none).unwrap(), default_rules());
    }

    #[test]
    fn rules_from_command_line() {
        let matcher = labelled(rules(&["Mem=one", "Mem(Mem)=two", "Move(T,T)=same"]).unwrap(), None);
        assert_snapshot!(matcher.dump(), @r###"
        Mem(Mem(_))              depth 2 constraints 2
        Move(T,T)                depth 1 constraints 2
        Mem(_)                   depth 1 constraints 1
        "###);
        let lines = run(&matcher, &trees()[..2]).unwrap();
        assert_eq!(lines, vec!["one Mem(42)", "two Mem(Mem(42))"]);
    }

    #[test]
    fn bad_rule_points_at_column() {
        let e = rules(&["Int=int", "Mem(Mem(_)=x"]).unwrap_err();
        assert_eq!(e.context, "Mem(Mem(_)=x (column 11)");
        match e.typ {
            ErrorType::Parse(p) => assert_eq!(p, ParseError{pos:2}),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn match_errors_keep_their_kind() {
        let e: ProcessingError = MatchError::NoMatch(NodeKind::Int).into();
        assert!(matches!(e.typ, ErrorType::Match(MatchError::NoMatch(NodeKind::Int))));
        let e: ProcessingError = MatchError::Ref(RefError::NullReference("Mem")).into();
        assert!(matches!(e.typ, ErrorType::Ref(RefError::NullReference("Mem"))));
        assert_eq!(e.context, "");
    }

    #[test]
    fn bare_matcher_fails_on_unmatched_tree() {
        let matcher = labelled(rules(&["Mem=mem"]).unwrap(), None);
        let e: ProcessingError = run(&matcher, &trees()).unwrap_err().into();
        assert!(matches!(e.typ, ErrorType::Match(MatchError::NoMatch(NodeKind::Move))));
    }
}
