use crate::{
    platform::OsName,
    repository::manifest::{Action, Library, Rule},
};

/// Whether something guarded by `rules` is enabled on `os`.
///
/// No rules at all means allowed. Otherwise every rule that applies to `os`
/// (no OS constraint, or a matching one) overwrites the verdict, so the last
/// applicable rule wins, and a list where nothing applies disallows.
pub fn rules_allow(rules: Option<&[Rule]>, os: OsName) -> bool {
    let Some(rules) = rules else {
        return true;
    };

    rules
        .iter()
        .filter(|rule| rule_applies(rule, os))
        .fold(false, |_, rule| rule.action == Action::Allow)
}

fn rule_applies(rule: &Rule, os: OsName) -> bool {
    rule.os
        .as_ref()
        .and_then(|constraint| constraint.name.as_deref())
        .map_or(true, |name| name == os.as_str())
}

pub fn is_library_allowed(library: &Library, os: OsName) -> bool {
    rules_allow(library.rules.as_deref(), os)
}

#[cfg(test)]
mod tests {
    use crate::repository::manifest::Os;

    use super::*;

    fn rule(action: Action, os: Option<&str>) -> Rule {
        Rule {
            action,
            os: os.map(|name| Os { name: Some(name.to_owned()) }),
        }
    }

    #[test]
    fn absent_rules_allow() {
        assert!(rules_allow(None, OsName::Windows));
    }

    #[test]
    fn empty_rules_disallow() {
        assert!(!rules_allow(Some(&[]), OsName::Windows));
    }

    #[test]
    fn nothing_applicable_disallows() {
        let rules = [rule(Action::Disallow, Some("linux"))];
        assert!(!rules_allow(Some(&rules), OsName::Windows));

        let rules = [rule(Action::Allow, Some("osx"))];
        assert!(!rules_allow(Some(&rules), OsName::Linux));
    }

    #[test]
    fn last_applicable_rule_wins() {
        let rules = [rule(Action::Allow, None), rule(Action::Disallow, Some("osx"))];
        assert!(rules_allow(Some(&rules), OsName::Linux));
        assert!(rules_allow(Some(&rules), OsName::Windows));
        assert!(!rules_allow(Some(&rules), OsName::Osx));

        let rules = [rule(Action::Disallow, Some("osx")), rule(Action::Allow, None)];
        assert!(rules_allow(Some(&rules), OsName::Osx));
    }

    #[test]
    fn os_without_name_applies_everywhere() {
        let rules = [Rule {
            action: Action::Allow,
            os: Some(Os { name: None }),
        }];
        assert!(rules_allow(Some(&rules), OsName::Linux));
    }
}
