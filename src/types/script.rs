//! Scripts: a set of accounts to open plus the operations to run against them

use super::account::AccountId;
use super::operation::Operation;
use rust_decimal::Decimal;

/// Accounts to open and operations to issue, in program order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    /// Account identities with their initial balances
    pub accounts: Vec<(AccountId, Decimal)>,

    /// Operations in program order
    pub operations: Vec<Operation>,
}

impl Script {
    /// Two accounts of 1000 each and ten mixed operations between them
    ///
    /// Applied sequentially every operation succeeds and the accounts end at
    /// 750 and 850.
    pub fn reference() -> Self {
        fn amount(value: i64) -> Decimal {
            Decimal::from(value)
        }

        Script {
            accounts: vec![(1, amount(1000)), (2, amount(1000))],
            operations: vec![
                Operation::Transfer {
                    from: 1,
                    to: 2,
                    amount: amount(300),
                },
                Operation::Withdraw {
                    account: 2,
                    amount: amount(500),
                },
                Operation::Transfer {
                    from: 1,
                    to: 2,
                    amount: amount(200),
                },
                Operation::Deposit {
                    account: 2,
                    amount: amount(400),
                },
                Operation::Deposit {
                    account: 1,
                    amount: amount(150),
                },
                Operation::Transfer {
                    from: 2,
                    to: 1,
                    amount: amount(250),
                },
                Operation::Transfer {
                    from: 1,
                    to: 2,
                    amount: amount(350),
                },
                Operation::Transfer {
                    from: 2,
                    to: 1,
                    amount: amount(100),
                },
                Operation::Withdraw {
                    account: 1,
                    amount: amount(450),
                },
                Operation::Transfer {
                    from: 2,
                    to: 1,
                    amount: amount(550),
                },
            ],
        }
    }

    /// Sum of all initial balances
    pub fn initial_total(&self) -> Decimal {
        self.accounts.iter().map(|(_, balance)| *balance).sum()
    }
}
