//! Create-permission hook consulted before an item's first write

use crate::model::{ItemSummary, User};

pub trait CreatePolicy: Send + Sync {
    fn create_permitted(&self, item: &ItemSummary, user: &User) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAllCreatePolicy;

impl CreatePolicy for AllowAllCreatePolicy {
    fn create_permitted(&self, _item: &ItemSummary, _user: &User) -> bool {
        true
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAllCreatePolicy;

impl CreatePolicy for DenyAllCreatePolicy {
    fn create_permitted(&self, _item: &ItemSummary, _user: &User) -> bool {
        false
    }
}

/// Permits items owned by one scope only
#[derive(Debug, Clone)]
pub struct OwnerScopeCreatePolicy {
    scope_short_name: String,
}

impl OwnerScopeCreatePolicy {
    pub fn new(scope_short_name: impl Into<String>) -> Self {
        Self {
            scope_short_name: scope_short_name.into(),
        }
    }
}

impl CreatePolicy for OwnerScopeCreatePolicy {
    fn create_permitted(&self, item: &ItemSummary, _user: &User) -> bool {
        item.owner == self.scope_short_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemUri, RegistrationStatus};

    fn owned_by(owner: &str) -> ItemSummary {
        ItemSummary {
            uri: ItemUri::new("http://www.assero.co.uk/MDRForms/ACME/V1", "F-ACME_X"),
            kind: "Form".to_string(),
            identifier: "X".to_string(),
            label: "X".to_string(),
            version: 1,
            scope_id: "NS-ACME".to_string(),
            owner: owner.to_string(),
            status: RegistrationStatus::Incomplete,
        }
    }

    #[test]
    fn test_owner_scope_policy() {
        let user = User::new("u", "u@example.com");
        let policy = OwnerScopeCreatePolicy::new("ACME");
        assert!(policy.create_permitted(&owned_by("ACME"), &user));
        assert!(!policy.create_permitted(&owned_by("CDISC"), &user));
        assert!(!DenyAllCreatePolicy.create_permitted(&owned_by("ACME"), &user));
    }
}
