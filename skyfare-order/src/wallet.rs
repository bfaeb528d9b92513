use serde::Serialize;
use skyfare_core::{CoreError, CoreResult};
use skyfare_shared::Amount;
use crate::models::{Transaction, TransactionKind};

pub const DEFAULT_INITIAL_BALANCE: i64 = 50_000;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct LedgerTotals {
    pub credited: Amount,
    pub debited: Amount,
}

/// Prepaid wallet: one balance plus an append-only log of what moved it.
///
/// `balance == initial_balance + credits - debits` holds after every call, and a
/// debit that would take the balance below zero is refused.
#[derive(Debug, Clone)]
pub struct WalletLedger {
    initial_balance: Amount,
    balance: Amount,
    transactions: Vec<Transaction>,
}

impl WalletLedger {
    /// Negative opening balances are treated as zero.
    pub fn new(initial_balance: Amount) -> Self {
        let initial_balance = initial_balance.max(Amount::ZERO);
        Self {
            initial_balance,
            balance: initial_balance,
            transactions: Vec::new(),
        }
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn initial_balance(&self) -> Amount {
        self.initial_balance
    }

    pub fn can_afford(&self, amount: Amount) -> bool {
        amount <= self.balance
    }

    pub fn credit(&mut self, amount: Amount, description: &str) -> CoreResult<Transaction> {
        ensure_positive(amount)?;

        let tx = Transaction::new(TransactionKind::Credit, amount, description.to_string());
        self.balance += amount;
        self.transactions.push(tx.clone());

        tracing::info!("Wallet credited {} ({}), balance {}", amount, description, self.balance);
        Ok(tx)
    }

    pub fn debit(&mut self, amount: Amount, description: &str) -> CoreResult<Transaction> {
        ensure_positive(amount)?;

        if amount > self.balance {
            tracing::warn!("Wallet debit of {} refused, balance {}", amount, self.balance);
            return Err(CoreError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        let tx = Transaction::new(TransactionKind::Debit, amount, description.to_string());
        self.balance -= amount;
        self.transactions.push(tx.clone());

        tracing::info!("Wallet debited {} ({}), balance {}", amount, description, self.balance);
        Ok(tx)
    }

    /// Newest first
    pub fn list_transactions(&self) -> Vec<Transaction> {
        self.transactions.iter().rev().cloned().collect()
    }

    pub fn list_transactions_by_kind(&self, kind: TransactionKind) -> Vec<Transaction> {
        self.transactions
            .iter()
            .rev()
            .filter(|tx| tx.kind == kind)
            .cloned()
            .collect()
    }

    pub fn totals(&self) -> LedgerTotals {
        self.transactions.iter().fold(
            LedgerTotals {
                credited: Amount::ZERO,
                debited: Amount::ZERO,
            },
            |mut totals, tx| {
                match tx.kind {
                    TransactionKind::Credit => totals.credited += tx.amount,
                    TransactionKind::Debit => totals.debited += tx.amount,
                }
                totals
            },
        )
    }

    pub fn is_consistent(&self) -> bool {
        let totals = self.totals();
        self.balance >= Amount::ZERO
            && self.balance == self.initial_balance + totals.credited - totals.debited
    }
}

impl Default for WalletLedger {
    fn default() -> Self {
        Self::new(Amount::from(DEFAULT_INITIAL_BALANCE))
    }
}

fn ensure_positive(amount: Amount) -> CoreResult<()> {
    if amount <= Amount::ZERO {
        return Err(CoreError::ValidationError(format!("amount must be positive, got {}", amount)));
    }
    Ok(())
}
