//! Activity Aggregation
//!
//! Folds raw transfer events into one buy/sell tally per token symbol.

use std::collections::HashMap;

use crate::model::{TokenActivity, TokenTransferEvent};

/// Tokens shown in a wallet report
pub const DISPLAY_LIMIT: usize = 8;

/// Per-symbol tallies in first-seen order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActivityMap {
    entries: Vec<TokenActivity>,
    index: HashMap<String, usize>,
}

impl ActivityMap {
    pub fn get(&self, symbol: &str) -> Option<&TokenActivity> {
        self.index.get(symbol).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenActivity> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<TokenActivity> {
        self.entries
    }

    fn entry(&mut self, event: &TokenTransferEvent) -> &mut TokenActivity {
        let next = self.entries.len();
        let idx = *self.index.entry(event.symbol.clone()).or_insert(next);
        if idx == next {
            self.entries
                .push(TokenActivity::new(&event.symbol, &event.contract_address));
        }
        &mut self.entries[idx]
    }
}

/// Group transfers by exact symbol. Inbound transfers count as buys,
/// outbound as sells.
pub fn aggregate(transfers: &[TokenTransferEvent]) -> ActivityMap {
    let mut map = ActivityMap::default();
    for event in transfers {
        map.entry(event).record(event.direction, event.amount);
    }
    map
}

/// Most active tokens first; equal totals keep first-seen order
pub fn rank_by_activity(activities: ActivityMap, limit: usize) -> Vec<TokenActivity> {
    let mut ranked = activities.into_vec();
    ranked.sort_by(|a, b| b.total().cmp(&a.total()));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, Direction};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn event(symbol: &str, direction: Direction) -> TokenTransferEvent {
        TokenTransferEvent {
            symbol: symbol.into(),
            contract_address: format!("0x{}", symbol.to_lowercase()),
            direction,
            amount: dec!(1),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_brett_scenario() {
        let transfers = vec![
            event("BRETT", Direction::In),
            event("BRETT", Direction::In),
            event("BRETT", Direction::Out),
            event("BRETT", Direction::In),
        ];

        let activity = aggregate(&transfers);
        let brett = activity.get("BRETT").unwrap();
        assert_eq!(brett.buys, 3);
        assert_eq!(brett.sells, 1);
        assert_eq!(brett.classification(), Classification::Buying);
    }

    #[test]
    fn test_tie_is_mixed() {
        let transfers = vec![
            event("DEGEN", Direction::In),
            event("DEGEN", Direction::Out),
            event("DEGEN", Direction::Out),
            event("DEGEN", Direction::In),
        ];
        let activity = aggregate(&transfers);
        assert_eq!(activity.get("DEGEN").unwrap().classification(), Classification::Mixed);
    }

    #[test]
    fn test_symbols_are_case_sensitive() {
        let transfers = vec![event("brett", Direction::In), event("BRETT", Direction::Out)];
        let activity = aggregate(&transfers);

        assert_eq!(activity.len(), 2);
        assert_eq!(activity.get("brett").unwrap().classification(), Classification::Buying);
        assert_eq!(activity.get("BRETT").unwrap().classification(), Classification::Selling);
    }

    #[test]
    fn test_first_seen_order() {
        let transfers = vec![
            event("TOSHI", Direction::In),
            event("AERO", Direction::Out),
            event("TOSHI", Direction::Out),
            event("BRETT", Direction::In),
        ];
        let symbols: Vec<_> = aggregate(&transfers).iter().map(|a| a.symbol.clone()).collect();
        assert_eq!(symbols, ["TOSHI", "AERO", "BRETT"]);
    }

    #[test]
    fn test_counts_independent_of_order() {
        let transfers = vec![
            event("BRETT", Direction::In),
            event("AERO", Direction::Out),
            event("BRETT", Direction::Out),
            event("AERO", Direction::Out),
            event("BRETT", Direction::In),
        ];
        let mut reversed = transfers.clone();
        reversed.reverse();
        let mut rotated = transfers.clone();
        rotated.rotate_left(2);

        let base = aggregate(&transfers);
        for permutation in [reversed, rotated] {
            let other = aggregate(&permutation);
            for activity in base.iter() {
                let counterpart = other.get(&activity.symbol).unwrap();
                assert_eq!(counterpart.buys, activity.buys);
                assert_eq!(counterpart.sells, activity.sells);
            }
            assert_eq!(other.len(), base.len());
        }
    }

    #[test]
    fn test_amounts_summed_per_side() {
        let mut buy = event("BRETT", Direction::In);
        buy.amount = dec!(250.5);
        let mut sell = event("BRETT", Direction::Out);
        sell.amount = dec!(100);

        let activity = aggregate(&[buy.clone(), buy, sell]);
        let brett = activity.get("BRETT").unwrap();
        assert_eq!(brett.buy_amount, dec!(501.0));
        assert_eq!(brett.sell_amount, dec!(100));
    }

    #[test]
    fn test_rank_by_activity() {
        let transfers = vec![
            event("AERO", Direction::In),
            event("BRETT", Direction::In),
            event("BRETT", Direction::Out),
            event("TOSHI", Direction::In),
            event("BRETT", Direction::In),
            event("TOSHI", Direction::Out),
        ];

        let ranked = rank_by_activity(aggregate(&transfers), 2);
        let symbols: Vec<_> = ranked.iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(symbols, ["BRETT", "TOSHI"]);
    }

    #[test]
    fn test_empty_input() {
        let activity = aggregate(&[]);
        assert!(activity.is_empty());
        assert!(rank_by_activity(activity, DISPLAY_LIMIT).is_empty());
    }
}
