//! Asset classification — mapping Horizon balance entries onto the three
//! balance kinds the viewer renders.

use serde::Serialize;

use crate::horizon::BalanceRecord;

/// Asset code reported for the native balance.
pub const NATIVE_ASSET_CODE: &str = "XLM";

/// A classified account balance. Exactly one variant applies per entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Asset {
    /// The network's native lumens balance.
    Native { balance: String },
    /// An issued credit asset (alphanum4 or alphanum12).
    Credit {
        balance: String,
        code: String,
        issuer: String,
    },
    /// Shares in a liquidity pool; carries the pool id instead of a code.
    LiquidityPoolShares { balance: String, pool_id: String },
}

impl Asset {
    pub fn balance(&self) -> &str {
        match self {
            Self::Native { balance }
            | Self::Credit { balance, .. }
            | Self::LiquidityPoolShares { balance, .. } => balance,
        }
    }

    /// The asset code, when the variant has one. Native is always `XLM`;
    /// pool shares have none.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Native { .. } => Some(NATIVE_ASSET_CODE),
            Self::Credit { code, .. } => Some(code),
            Self::LiquidityPoolShares { .. } => None,
        }
    }

    pub fn issuer(&self) -> Option<&str> {
        match self {
            Self::Credit { issuer, .. } => Some(issuer),
            _ => None,
        }
    }
}

/// Classify an account's balance entries by their `asset_type` discriminator.
///
/// Entries with an unrecognized tag, or a recognized tag missing its required
/// fields, are dropped with a warning rather than producing a hole in the
/// list.
pub fn classify(entries: &[BalanceRecord]) -> Vec<Asset> {
    entries
        .iter()
        .filter_map(|entry| match classify_one(entry) {
            Some(asset) => Some(asset),
            None => {
                tracing::warn!(
                    asset_type = %entry.asset_type,
                    "dropping balance entry with unrecognized or incomplete asset type"
                );
                None
            }
        })
        .collect()
}

fn classify_one(entry: &BalanceRecord) -> Option<Asset> {
    match entry.asset_type.as_str() {
        "native" => Some(Asset::Native {
            balance: entry.balance.clone(),
        }),
        "credit_alphanum4" | "credit_alphanum12" => Some(Asset::Credit {
            balance: entry.balance.clone(),
            code: entry.asset_code.clone()?,
            issuer: entry.asset_issuer.clone()?,
        }),
        "liquidity_pool_shares" => Some(Asset::LiquidityPoolShares {
            balance: entry.balance.clone(),
            pool_id: entry.liquidity_pool_id.clone()?,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(asset_type: &str) -> BalanceRecord {
        BalanceRecord {
            balance: "10.0000000".into(),
            asset_type: asset_type.into(),
            asset_code: None,
            asset_issuer: None,
            liquidity_pool_id: None,
        }
    }

    #[test]
    fn native_becomes_xlm_without_issuer() {
        let assets = classify(&[entry("native")]);
        assert_eq!(
            assets,
            vec![Asset::Native {
                balance: "10.0000000".into()
            }]
        );
        assert_eq!(assets[0].code(), Some("XLM"));
        assert_eq!(assets[0].issuer(), None);
    }

    #[test]
    fn credit_carries_code_and_issuer_verbatim() {
        for tag in ["credit_alphanum4", "credit_alphanum12"] {
            let mut record = entry(tag);
            record.asset_code = Some("USDC".into());
            record.asset_issuer =
                Some("GAAZI4TCR3TY5OJHCTJC2A4QSY6CJWJH5IAJTGKIN2ER7LBNVKOCCWN7".into());
            let assets = classify(&[record]);
            assert_eq!(assets.len(), 1);
            assert_eq!(assets[0].code(), Some("USDC"));
            assert_eq!(
                assets[0].issuer(),
                Some("GAAZI4TCR3TY5OJHCTJC2A4QSY6CJWJH5IAJTGKIN2ER7LBNVKOCCWN7")
            );
        }
    }

    #[test]
    fn pool_shares_carry_only_the_pool_id() {
        let mut record = entry("liquidity_pool_shares");
        record.liquidity_pool_id =
            Some("dd7b1ab831c273310ddbec6f97870aa83c2fbd78ce22aded37ecbf4f3380fac7".into());
        let assets = classify(&[record]);
        assert_eq!(
            assets,
            vec![Asset::LiquidityPoolShares {
                balance: "10.0000000".into(),
                pool_id: "dd7b1ab831c273310ddbec6f97870aa83c2fbd78ce22aded37ecbf4f3380fac7".into(),
            }]
        );
        assert_eq!(assets[0].code(), None);
    }

    #[test]
    fn unknown_tags_are_dropped_not_holes() {
        let assets = classify(&[entry("native"), entry("claimable_balance"), entry("native")]);
        assert_eq!(assets.len(), 2);
    }

    #[test]
    fn credit_without_issuer_is_dropped() {
        let mut record = entry("credit_alphanum4");
        record.asset_code = Some("USDC".into());
        assert!(classify(&[record]).is_empty());
    }
}
