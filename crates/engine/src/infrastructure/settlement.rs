//! Settlement adapter that records payouts in the log instead of on-chain.

use std::sync::Arc;

use async_trait::async_trait;

use crate::infrastructure::ports::{
    RandomPort, SettlementError, SettlementPort, SettlementReceipt, SettlementRequest,
};

pub struct LoggingSettlement {
    random: Arc<dyn RandomPort>,
}

impl LoggingSettlement {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }
}

#[async_trait]
impl SettlementPort for LoggingSettlement {
    async fn settle(&self, request: SettlementRequest) -> Result<SettlementReceipt, SettlementError> {
        if request.stake_amount.is_zero() {
            return Err(SettlementError::Rejected(format!(
                "Session {} has nothing staked",
                request.session_id
            )));
        }

        let reference = format!("log-{}", self.random.gen_uuid().simple());
        tracing::info!(
            session_id = %request.session_id,
            player = %request.player_address,
            success = request.success,
            stake = %request.stake_amount,
            multiplier = %request.payout_multiplier,
            reference = %reference,
            "Settlement recorded"
        );
        Ok(SettlementReceipt { reference })
    }
}
