//! Rubro membership as a dispatch table.

use super::RubroId;
use crate::accounts::AccountClass;
use crate::assets::AssetCategory;

/// Extra handling a rubro applies to the items it claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RubroSpecial {
    None,
    /// Cash of brokers and exchanges goes to a separate `(Liquidez)` provider.
    CashCarveOut,
    /// Items carry TNA/TEA metadata.
    YieldBearing,
    /// Items come from the fixed-deposit collaborator, not from positions.
    FixedDeposits,
}

pub struct RubroRule {
    pub id: RubroId,
    pub name: &'static str,
    pub selects: fn(AccountClass, AssetCategory) -> bool,
    pub special: RubroSpecial,
}

fn wallets(class: AccountClass, category: AssetCategory) -> bool {
    match category {
        AssetCategory::CashArs | AssetCategory::CashUsd => class != AccountClass::Frasco,
        AssetCategory::Other => matches!(class, AccountClass::Wallet | AccountClass::Frasco),
        _ => false,
    }
}

fn frascos(class: AccountClass, category: AssetCategory) -> bool {
    class == AccountClass::Frasco && category.is_cash()
}

fn plazos(_class: AccountClass, _category: AssetCategory) -> bool {
    false
}

fn cedears(class: AccountClass, category: AssetCategory) -> bool {
    category == AssetCategory::Cedear
        || (category == AssetCategory::Other && class == AccountClass::Broker)
}

fn crypto(class: AccountClass, category: AssetCategory) -> bool {
    matches!(category, AssetCategory::Crypto | AssetCategory::Stable)
        || (category == AssetCategory::Other && class == AccountClass::Exchange)
}

fn fondos(_class: AccountClass, category: AssetCategory) -> bool {
    category == AssetCategory::Fci
}

/// Every rubro, in display order. Selectors are disjoint.
pub static RUBRO_RULES: [RubroRule; 6] = [
    RubroRule {
        id: RubroId::Wallets,
        name: "Wallets",
        selects: wallets,
        special: RubroSpecial::CashCarveOut,
    },
    RubroRule {
        id: RubroId::Frascos,
        name: "Frascos",
        selects: frascos,
        special: RubroSpecial::YieldBearing,
    },
    RubroRule {
        id: RubroId::Plazos,
        name: "Plazos",
        selects: plazos,
        special: RubroSpecial::FixedDeposits,
    },
    RubroRule {
        id: RubroId::Cedears,
        name: "CEDEARs",
        selects: cedears,
        special: RubroSpecial::None,
    },
    RubroRule {
        id: RubroId::Crypto,
        name: "Crypto",
        selects: crypto,
        special: RubroSpecial::None,
    },
    RubroRule {
        id: RubroId::Fondos,
        name: "Fondos",
        selects: fondos,
        special: RubroSpecial::None,
    },
];

/// Rule that claims a position row, if any.
pub fn rule_for(class: AccountClass, category: AssetCategory) -> Option<&'static RubroRule> {
    RUBRO_RULES.iter().find(|rule| (rule.selects)(class, category))
}

pub fn rule_by_id(id: RubroId) -> &'static RubroRule {
    match id {
        RubroId::Wallets => &RUBRO_RULES[0],
        RubroId::Frascos => &RUBRO_RULES[1],
        RubroId::Plazos => &RUBRO_RULES[2],
        RubroId::Cedears => &RUBRO_RULES[3],
        RubroId::Crypto => &RUBRO_RULES[4],
        RubroId::Fondos => &RUBRO_RULES[5],
    }
}
