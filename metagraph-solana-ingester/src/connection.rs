//! The chain boundary: one-shot snapshot reads and push subscriptions.

use crate::{account::RawAccount, config::SolanaConfig};
use anyhow::Result;
use async_trait::async_trait;
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    nonblocking::{pubsub_client::PubsubClient, rpc_client::RpcClient},
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
};
use solana_sdk::{account::Account, commitment_config::CommitmentConfig, pubkey::Pubkey};
use tokio::sync::{mpsc, oneshot};
use tokio_stream::StreamExt;

/// Read access to the chain: the full current account set of a program and a
/// push stream of account changes.
///
/// No acknowledgement or backpressure channel is assumed on the subscription
/// side; delivery errors after a subscription is established are this layer's
/// concern and end the stream.
#[async_trait]
pub trait ChainConnection: Send + Sync {
    /// Fetches a snapshot of every account currently owned by `program_id`.
    async fn fetch_program_accounts(&self, program_id: &Pubkey) -> Result<Vec<RawAccount>>;

    /// Registers a live subscription for `program_id` and returns the channel
    /// on which change notifications are delivered, in observation order.
    /// Returns only once the subscription is established: an `Ok` receiver is
    /// backed by a live subscription, an `Err` means none exists.
    async fn subscribe_account_changes(
        &self,
        program_id: &Pubkey,
    ) -> Result<mpsc::UnboundedReceiver<RawAccount>>;
}

/// A [`ChainConnection`] backed by `solana-client`'s nonblocking RPC and
/// websocket clients.
pub struct SolanaConnection {
    rpc: RpcClient,
    ws_url: String,
    commitment: CommitmentConfig,
}

impl SolanaConnection {
    pub fn new(config: &SolanaConfig) -> Self {
        let commitment = CommitmentConfig {
            commitment: config.commitment,
        };
        Self {
            rpc: RpcClient::new_with_commitment(config.rpc_url.clone(), commitment),
            ws_url: config.ws_url.clone(),
            commitment,
        }
    }

    fn account_config(&self) -> RpcAccountInfoConfig {
        RpcAccountInfoConfig {
            encoding: Some(UiAccountEncoding::Base64),
            commitment: Some(self.commitment),
            ..RpcAccountInfoConfig::default()
        }
    }
}

#[async_trait]
impl ChainConnection for SolanaConnection {
    async fn fetch_program_accounts(&self, program_id: &Pubkey) -> Result<Vec<RawAccount>> {
        let config = RpcProgramAccountsConfig {
            account_config: self.account_config(),
            ..RpcProgramAccountsConfig::default()
        };
        let accounts = self
            .rpc
            .get_program_accounts_with_config(program_id, config)
            .await?;
        Ok(accounts
            .into_iter()
            .map(|(pubkey, account)| RawAccount::from_keyed(pubkey, account))
            .collect())
    }

    async fn subscribe_account_changes(
        &self,
        program_id: &Pubkey,
    ) -> Result<mpsc::UnboundedReceiver<RawAccount>> {
        let client = PubsubClient::new(&self.ws_url).await?;
        let config = RpcProgramAccountsConfig {
            account_config: self.account_config(),
            ..RpcProgramAccountsConfig::default()
        };
        let (tx, rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();
        let program_id = *program_id;

        // The stream borrows the client, so the subscription must be made
        // inside the task that owns it; the oneshot reports whether it was
        // actually established before the receiver is handed back.
        tokio::spawn(async move {
            let (mut stream, _unsubscribe) =
                match client.program_subscribe(&program_id, Some(config)).await {
                    Ok(subscription) => subscription,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
            let _ = ready_tx.send(Ok(()));

            while let Some(response) = stream.next().await {
                let keyed = response.value;
                let Ok(pubkey) = keyed.pubkey.parse::<Pubkey>() else {
                    tracing::warn!("unparseable pubkey in account notification: {}", keyed.pubkey);
                    continue;
                };
                let Some(account) = keyed.account.decode::<Account>() else {
                    tracing::warn!(account = %pubkey, "undecodable account data in notification");
                    continue;
                };
                if tx.send(RawAccount::from_keyed(pubkey, account)).is_err() {
                    // Receiver side is gone; stop forwarding.
                    return;
                }
            }
            tracing::warn!(program = %program_id, "account-change stream ended");
        });

        match ready_rx.await {
            Ok(Ok(())) => Ok(rx),
            Ok(Err(e)) => Err(anyhow::Error::new(e)
                .context(format!("program subscription failed for {program_id}"))),
            Err(_) => anyhow::bail!(
                "subscription task for {program_id} exited before the subscription was established"
            ),
        }
    }
}
