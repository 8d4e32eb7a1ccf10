use crate::record::Record;
use std::collections::HashMap;

/// First-seen-order numeric ids for `instance_group`, `network`, and
/// `deployment` values, assigned once when a [`crate::RecordSet`] is built.
///
/// The `q-` grammar's `g`/`n`/`m` keys carry only digits, but
/// `instance_group`/`network`/`deployment` are names, not numbers; these
/// tables are what lets a digit-encoded criterion address a name.
#[derive(Debug, Default)]
pub struct Ordinals {
    groups: HashMap<String, u32>,
    networks: HashMap<String, u32>,
    deployments: HashMap<String, u32>,
}

impl Ordinals {
    #[must_use]
    pub fn build(records: &[Record]) -> Self {
        let mut ordinals = Self::default();
        for record in records {
            intern(&mut ordinals.groups, &record.instance_group);
            intern(&mut ordinals.networks, &record.network);
            intern(&mut ordinals.deployments, &record.deployment);
        }
        ordinals
    }

    #[must_use]
    pub fn group_ordinal(&self, value: &str) -> Option<u32> {
        self.groups.get(value).copied()
    }

    #[must_use]
    pub fn network_ordinal(&self, value: &str) -> Option<u32> {
        self.networks.get(value).copied()
    }

    #[must_use]
    pub fn deployment_ordinal(&self, value: &str) -> Option<u32> {
        self.deployments.get(value).copied()
    }
}

fn intern(map: &mut HashMap<String, u32>, value: &str) {
    if !map.contains_key(value) {
        let next = u32::try_from(map.len()).expect("fewer than u32::MAX distinct values");
        map.insert(value.to_string(), next);
    }
}
