use crate::types::{RawRecord, RawTable};
use log::debug;
use std::collections::BTreeMap;

/// Fixed alias -> canonical country name lookup.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new(aliases: BTreeMap<String, String>) -> Self {
        AliasTable { aliases }
    }

    /// Unlisted names pass through unchanged.
    pub fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Rewrite every row's country to its canonical key.
    pub fn normalize(&self, table: &RawTable) -> RawTable {
        let mut renamed = 0usize;
        let rows = table
            .rows
            .iter()
            .map(|r| {
                let country = self.canonical(&r.country);
                if country != r.country {
                    renamed += 1;
                }
                RawRecord {
                    country: country.to_string(),
                    ..r.clone()
                }
            })
            .collect();
        debug!("Normalized {} country names", renamed);
        RawTable {
            date_labels: table.date_labels.clone(),
            rows,
        }
    }
}

impl From<&BTreeMap<String, String>> for AliasTable {
    fn from(aliases: &BTreeMap<String, String>) -> Self {
        AliasTable::new(aliases.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn table() -> AliasTable {
        AliasTable::from(&Config::default().aliases)
    }

    #[test]
    fn aliases_map_to_china() {
        let t = table();
        for alias in ["Mainland China", "Hong Kong", "Macau", "Taiwan*"] {
            assert_eq!(t.canonical(alias), "China");
        }
        assert_eq!(t.canonical("France"), "France");
    }

    #[test]
    fn renormalizing_is_a_no_op() {
        let t = table();
        for name in ["Macau", "China", "Peru"] {
            let once = t.canonical(name);
            assert_eq!(t.canonical(once), once);
        }
    }

    #[test]
    fn normalize_rewrites_country_only() {
        let raw = RawTable {
            date_labels: vec!["1/22/20".into()],
            rows: vec![RawRecord {
                province: Some("Macau".into()),
                country: "Macau".into(),
                lat: Some(22.16),
                long: Some(113.55),
                counts: vec![1],
            }],
        };
        let out = table().normalize(&raw);
        assert_eq!(out.rows[0].country, "China");
        assert_eq!(out.rows[0].province.as_deref(), Some("Macau"));
        assert_eq!(out.rows[0].counts, vec![1]);
        assert_eq!(raw.rows[0].country, "Macau");
    }
}
