// services/tx/simulation/simulation_service.rs

use crate::errors::error::AppError;
use crate::infrastructure::provider::Connection;
use crate::services::tx::signer::TxSigner;
use crate::services::tx::simulation::abi_codec::AbiCodec;
use ethers_core::abi::Token;
use ethers_core::types::{Address, Bytes, TransactionRequest};
use std::sync::Arc;

/// 只读调用：以发送方身份在当前状态上执行 eth_call，不产生交易
pub struct SimulationService {
    connection: Arc<Connection>,
    signer: Arc<dyn TxSigner>,
}

impl SimulationService {
    pub fn new(connection: Arc<Connection>, signer: Arc<dyn TxSigner>) -> Self {
        Self { connection, signer }
    }

    pub async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, AppError> {
        let req = TransactionRequest::new()
            .from(self.signer.address())
            .to(to)
            .data(input);

        self.connection
            .provider()
            .call(&req.into())
            .await
            .map_err(|e| AppError::Call(e.to_string()))
    }

    /// pack -> eth_call -> unpack
    pub async fn call_function<C: AbiCodec + ?Sized>(
        &self,
        to: Address,
        codec: &C,
        function: &str,
        args: &[Token],
    ) -> Result<Vec<Token>, AppError> {
        let input = codec.pack(function, args)?;
        let output = self.call(to, input).await?;
        codec.unpack(function, &output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tx::simulation::abi_codec::parse_abi;
    use crate::services::tx::signer::LocalSigner;
    use crate::test_utils::{ERC20_BALANCE_OF_ABI, FakeProvider, TEST_ADDRESS, TEST_PRIVATE_KEY};
    use ethers_core::types::U256;

    fn signer() -> Arc<dyn TxSigner> {
        Arc::new(LocalSigner::from_hex(TEST_PRIVATE_KEY).unwrap())
    }

    async fn connection(fake: Arc<FakeProvider>) -> Arc<Connection> {
        Arc::new(Connection::from_provider(fake).await.unwrap())
    }

    #[tokio::test]
    async fn call_uses_sender_as_from() {
        let fake = Arc::new(FakeProvider {
            call_result: Some(Bytes::from(vec![0x01, 0x02])),
            ..Default::default()
        });
        let from: Address = TEST_ADDRESS.parse().unwrap();
        let to = Address::repeat_byte(0x44);
        let svc = SimulationService::new(connection(fake.clone()).await, signer());

        let out = svc.call(to, Bytes::from(vec![0xde, 0xad])).await.unwrap();
        assert_eq!(out, Bytes::from(vec![0x01, 0x02]));

        let calls = fake.call_requests();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].from(), Some(&from));
        assert_eq!(calls[0].to_addr(), Some(&to));
        // 只读调用不会触碰 nonce / gas / 广播
        assert!(fake.nonce_queries().is_empty());
        assert!(fake.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn call_failure_is_call_error() {
        let fake = Arc::new(FakeProvider {
            call_result: None,
            ..Default::default()
        });
        let svc = SimulationService::new(connection(fake).await, signer());
        let err = svc.call(Address::zero(), Bytes::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Call(_)));
    }

    #[tokio::test]
    async fn call_function_round_trips_through_codec() {
        let encoded = ethers_core::abi::encode(&[Token::Uint(U256::from(1_000_000))]);
        let fake = Arc::new(FakeProvider {
            call_result: Some(Bytes::from(encoded)),
            ..Default::default()
        });
        let svc = SimulationService::new(connection(fake.clone()).await, signer());
        let abi = parse_abi(ERC20_BALANCE_OF_ABI).unwrap();

        let values = svc
            .call_function(
                Address::repeat_byte(0x55),
                &abi,
                "balanceOf",
                &[Token::Address(Address::repeat_byte(0x66))],
            )
            .await
            .unwrap();

        assert_eq!(values, vec![Token::Uint(U256::from(1_000_000))]);
        let sent_input = fake.call_requests()[0].data().cloned().unwrap();
        assert_eq!(&sent_input[..4], &[0x70, 0xa0, 0x82, 0x31]);
    }
}
