//! Hand terminal results to the settlement collaborator.

use std::sync::Arc;

use serde::Serialize;
use vaultbreak_domain::GameAttemptResult;

use super::GameUseCaseError;
use crate::infrastructure::ports::{
    SettlementPort, SettlementReceipt, SettlementRequest, WalletCapability,
};

/// What happened to a result's stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SettlementOutcome {
    /// Mock sessions never move real stake.
    SkippedMockMode,
    SkippedNoStake,
    Settled { receipt: SettlementReceipt },
    Failed { error: String },
}

pub struct SettleResult {
    settlement: Arc<dyn SettlementPort>,
}

impl SettleResult {
    pub fn new(settlement: Arc<dyn SettlementPort>) -> Self {
        Self { settlement }
    }

    pub async fn execute(
        &self,
        result: &GameAttemptResult,
        wallet: &WalletCapability,
    ) -> Result<SettlementOutcome, GameUseCaseError> {
        if result.mock_mode {
            tracing::info!(
                session_id = %result.session_id,
                success = result.success,
                "Mock session, settlement skipped"
            );
            return Ok(SettlementOutcome::SkippedMockMode);
        }
        if result.stake_amount.as_ref().filter(|s| !s.is_zero()).is_none() {
            return Ok(SettlementOutcome::SkippedNoStake);
        }

        let address = wallet.settlement_address().ok_or_else(|| {
            GameUseCaseError::validation("A connected wallet is required to settle a stake")
        })?;
        let Some(request) = SettlementRequest::from_result(result, address) else {
            return Ok(SettlementOutcome::SkippedNoStake);
        };

        let receipt = self.settlement.settle(request).await?;
        tracing::info!(
            session_id = %result.session_id,
            success = result.success,
            reference = %receipt.reference,
            "Result settled"
        );
        Ok(SettlementOutcome::Settled { receipt })
    }

    /// Settle after a terminal transition. The result already exists at this
    /// point, so a settlement failure is reported rather than raised.
    pub async fn settle_terminal(
        &self,
        result: &GameAttemptResult,
        wallet: &WalletCapability,
    ) -> SettlementOutcome {
        match self.execute(result, wallet).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    session_id = %result.session_id,
                    error = %e,
                    "Settlement failed"
                );
                SettlementOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}
