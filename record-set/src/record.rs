use dns_name::Fqdn;

/// A single instance endpoint, decoded from one row of a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub instance_group: String,
    pub network: String,
    pub deployment: String,
    pub ip: String,
    pub domain: Fqdn,
    pub az_id: Option<String>,
    /// Decimal string form of the truncated integer, e.g. `"3"`.
    pub instance_index: Option<String>,
}

impl Record {
    /// The full per-instance name: `id.instance_group.network.deployment.domain.`
    ///
    /// `domain` already carries a trailing dot. Used to match a plain
    /// (non-`q-`) query name exactly.
    #[must_use]
    pub fn full_fqdn(&self) -> String {
        format!(
            "{}.{}.{}.{}.{}",
            self.id,
            self.instance_group,
            self.network,
            self.deployment,
            self.domain.as_str()
        )
    }

    /// The per-group name, omitting the instance id and the trailing dot:
    /// `instance_group.network.deployment.domain`.
    ///
    /// A `q-` query names a group, network, deployment, and domain, but no
    /// specific instance; this (dot-normalized, so it compares equal
    /// whether or not the query itself ended in a dot) is what its suffix
    /// is matched against.
    #[must_use]
    pub fn group_fqdn(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.instance_group,
            self.network,
            self.deployment,
            self.domain.without_trailing_dot()
        )
    }
}
