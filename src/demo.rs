use crate::matcher::dispatch::{MatchError,Matcher};
use crate::matcher::pattern::Pattern;
use crate::tree::ast::{int,mem,mov,Node};
use crate::tree::sref::Ref;

pub const FALLBACK_LABEL: &str = "auto!";

/// The rule table used when none is given on the command line.
pub fn default_rules() -> Vec<(Pattern,String)> {
    vec![
        (Pattern::mem(Pattern::mem(Pattern::Any)), "Mem with a Mem child!".to_string()),
        (Pattern::mem(Pattern::Any), "Mem!".to_string()),
        (Pattern::MoveAlike, "Move with same shape dst and src!".to_string()),
        (Pattern::mov(Pattern::Any, Pattern::Any), "Move with different shape dst and src!".to_string()),
    ]
}

/// Mem(42), Mem(Mem(42)), Move(21,Mem(Mem(42))), Move(21,42) and 42, sharing their leaves.
pub fn trees() -> Vec<Ref<Node>> {
    let i1 = int(42);
    let i2 = int(21);
    let mem1 = mem(&i1);
    let mem2 = mem(&mem1);
    let move1 = mov(&i2, &mem2);
    let move2 = mov(i2, &i1);
    vec![mem1.into(), mem2.into(), move1.into(), move2.into(), i1.into()]
}

/// A matcher whose actions print their label followed by the matched tree.
pub fn labelled(rules: Vec<(Pattern,String)>, fallback: Option<String>) -> Matcher<'static,String> {
    let mut matcher = Matcher::new();
    for (pattern, label) in rules {
        matcher = matcher.rule(pattern, move |alt| format!("{} {}", label, alt));
    }
    if let Some(label) = fallback {
        matcher = matcher.fallback(move |alt| format!("{} {}", label, alt));
    }
    matcher
}

pub fn run(matcher: &Matcher<String>, trees: &[Ref<Node>]) -> Result<Vec<String>,MatchError> {
    trees.iter().map(|t| matcher.dispatch_ref(t)).collect()
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use super::*;
    use crate::tree::ast::NodeKind;

    #[test]
    fn default_transcript() {
        let matcher = labelled(default_rules(), Some(FALLBACK_LABEL.to_string()));
        let lines = run(&matcher, &trees()).unwrap();
        assert_snapshot!(lines.join("\n"), @r###"
        Mem! Mem(42)
        Mem with a Mem child! Mem(Mem(42))
        Move with different shape dst and src! Move(21,Mem(Mem(42)))
        Move with same shape dst and src! Move(21,42)
        auto! 42
        "###);
    }

    #[test]
    fn leaves_are_shared() {
        let trees = trees();
        let leaf = &trees[4];
        // mem1 and move2 hold it too.
        assert_eq!(leaf.holders(), 3);
    }

    #[test]
    fn without_fallback_the_leaf_has_no_rule() {
        let matcher = labelled(default_rules(), None);
        assert_eq!(run(&matcher, &trees()), Err(MatchError::NoMatch(NodeKind::Int)));
    }

    #[test]
    fn fallback_only() {
        let matcher = labelled(vec![], Some("any".to_string()));
        let lines = run(&matcher, &trees()[2..3]).unwrap();
        assert_eq!(lines, vec!["any Move(21,Mem(Mem(42)))"]);
    }
}
