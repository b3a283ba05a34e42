use log::{debug,trace};
use crate::matcher::pattern::{Pattern,Specificity};
use crate::tree::ast::NodeKind;
use crate::tree::sref::{Kind,Ref,RefError};
use crate::tree::variant::Alt;

#[derive(Clone,PartialEq,Eq,Debug)]
pub enum MatchError {
    /// No rule applied and there was no fallback to catch it.
    NoMatch(NodeKind),
    Ref(RefError),
}

impl From<RefError> for MatchError {
    fn from(e: RefError) -> Self {
        MatchError::Ref(e)
    }
}

pub type Action<'a,R> = Box<dyn Fn(&Alt) -> R + 'a>;

struct Rule<'a,R> {
    pattern: Pattern,
    specificity: Specificity,
    action: Action<'a,R>,
}

/// Picks exactly one action for a projected node.
///
/// Rules are kept sorted from most to least specific, so dispatch is a single scan that stops at
/// the first pattern that fits. The fallback sits outside the table and runs only when nothing in
/// it matched. Every matcher is expected to have one; without it, dispatch can fail with
/// `NoMatch`.
///
/// For example, with rules for `Mem(_)` and `Mem(Mem(_))` registered in either order, the table
/// is:
/// - Mem(Mem(_))
/// - Mem(_)
///
/// and Mem(Mem(42)) goes to the first rule while Mem(42) goes to the second.
pub struct Matcher<'a,R> {
    rules: Vec<Rule<'a,R>>,
    fallback: Option<Action<'a,R>>,
}

impl<'a,R> Default for Matcher<'a,R> {
    fn default() -> Self {
        Matcher {
            rules: vec![],
            fallback: None,
        }
    }
}

impl<'a,R> Matcher<'a,R> {
    pub fn new() -> Self {
        Matcher::default()
    }

    pub fn with_fallback<F: Fn(&Alt) -> R + 'a>(action: F) -> Self {
        Matcher::new().fallback(action)
    }

    /// Adds a rule after every rule at least as specific, so equally specific rules keep the order
    /// they were registered in.
    pub fn rule<F: Fn(&Alt) -> R + 'a>(mut self, pattern: Pattern, action: F) -> Self {
        let specificity = pattern.specificity();
        let i = self.rules.iter().position(|r| r.specificity < specificity).unwrap_or(self.rules.len());
        trace!("Registering {} at {} ({:?})", pattern, i, specificity);
        self.rules.insert(i, Rule {
            pattern,
            specificity,
            action: Box::new(action),
        });
        self
    }

    /// Sets the fallback, replacing any earlier one.
    pub fn fallback<F: Fn(&Alt) -> R + 'a>(mut self, action: F) -> Self {
        self.fallback = Some(Box::new(action));
        self
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Patterns in the order dispatch tries them.
    pub fn patterns(&self) -> Vec<&Pattern> {
        self.rules.iter().map(|r| &r.pattern).collect()
    }

    /// Index (in dispatch order) of the rule that would fire. None means the fallback, if any.
    pub fn select(&self, alt: &Alt) -> Option<usize> {
        self.rules.iter().position(|r| r.pattern.matches(alt))
    }

    pub fn dispatch(&self, alt: &Alt) -> Result<R, MatchError> {
        if alt.node().is_none() {
            return Err(RefError::NullReference(alt.tag().name()).into());
        }
        match self.select(alt) {
            Some(i) => {
                let rule = &self.rules[i];
                debug!("{} matched rule {} ({})", alt.tag(), i, rule.pattern);
                Ok((rule.action)(alt))
            }
            None => {
                if let Some(fallback) = &self.fallback {
                    debug!("{} matched no rule, using fallback", alt.tag());
                    Ok(fallback(alt))
                } else {
                    debug!("{} matched nothing", alt.tag());
                    Err(MatchError::NoMatch(alt.tag()))
                }
            }
        }
    }

    pub fn dispatch_ref<T: Kind>(&self, r: &Ref<T>) -> Result<R, MatchError> {
        self.dispatch(&r.project()?)
    }

    pub fn dump(&self) -> String {
        let mut result = String::new();
        for rule in &self.rules {
            let Specificity { depth, constraints } = rule.specificity;
            result.push_str(&format!("{:24} depth {} constraints {}\n", rule.pattern.to_string(), depth, constraints));
        }
        if self.fallback.is_some() {
            result.push_str(&format!("{:24} fallback\n", Pattern::Any.to_string()));
        }
        result
    }
}
