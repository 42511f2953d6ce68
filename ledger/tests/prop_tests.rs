use proptest::prelude::*;

use btcstake_ledger::Ledger;
use btcstake_nullables::NullStore;
use btcstake_types::Principal;

fn account(i: usize) -> Principal {
    Principal::new(format!("acct{i}"))
}

proptest! {
    /// Transfers never create or destroy value, successful or not.
    #[test]
    fn transfers_conserve_total(
        seeds in prop::collection::vec(0u128..1_000_000, 4),
        moves in prop::collection::vec((0usize..4, 0usize..4, 0u128..2_000_000), 0..40),
    ) {
        let store = NullStore::new();
        let ledger = Ledger::new(&store);
        for (i, amount) in seeds.iter().enumerate() {
            ledger.credit(&account(i), *amount).unwrap();
        }
        let total: u128 = seeds.iter().sum();

        for (from, to, amount) in moves {
            let _ = ledger.transfer(amount, &account(from), &account(to));
            prop_assert_eq!(ledger.total_balances().unwrap(), total);
        }
    }

    /// A rejected debit leaves the balance exactly where it was.
    #[test]
    fn rejected_debit_is_noop(balance in 0u128..1_000_000, extra in 1u128..1_000_000) {
        let store = NullStore::new();
        let ledger = Ledger::new(&store);
        ledger.credit(&account(0), balance).unwrap();
        prop_assert!(ledger.debit(&account(0), balance + extra).is_err());
        prop_assert_eq!(ledger.get_balance(&account(0)).unwrap(), balance);
    }
}
