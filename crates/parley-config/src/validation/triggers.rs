//! Trigger phrase validation: presence and start/stop overlap.

use std::collections::HashMap;

use parley_common::normalize_phrase;

use crate::schema::ParleyConfig;

pub(crate) fn validate_triggers(errors: &mut Vec<String>, config: &ParleyConfig) {
    let triggers = &config.triggers;
    if triggers.start.is_empty() {
        errors.push("triggers.start must list at least one phrase".into());
    }
    if triggers.stop.is_empty() {
        errors.push("triggers.stop must list at least one phrase".into());
    }

    let mut owners: HashMap<String, &str> = HashMap::new();
    let groups = [
        ("start", &triggers.start),
        ("stop", &triggers.stop),
        ("resume", &triggers.resume),
    ];
    for (group, phrases) in groups {
        for phrase in phrases {
            let key = normalize_phrase(phrase);
            if key.is_empty() {
                errors.push(format!("triggers.{group} contains an empty phrase"));
                continue;
            }
            match owners.get(&key) {
                Some(owner) if *owner != group => {
                    errors.push(format!(
                        "trigger phrase {key:?} is bound to both {owner} and {group}"
                    ));
                }
                _ => {
                    owners.insert(key, group);
                }
            }
        }
    }
}
