use crate::core::{Chain, Ledger, SharedLedger};
use crate::events::LedgerEvent;
use std::sync::Arc;

/// Longest-valid-chain rule.
///
/// A peer chain wins only when it is strictly longer than the best seen so
/// far and passes the peer's own validation. Peers sharing the local node id
/// are skipped. When two peers tie at the maximum, the one iterated first wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsensusResolver;

impl ConsensusResolver {
    /// Replaces `local`'s chain with a copy of the winning peer chain and
    /// returns true, or leaves it untouched and returns false.
    pub fn resolve<'a, I>(local: &mut Ledger, peers: I) -> bool
    where
        I: IntoIterator<Item = &'a Ledger>,
    {
        let mut max_length = local.len();
        let mut winner: Option<&Ledger> = None;

        local.events().emit(&LedgerEvent::ConsensusStarted {
            node_id: local.node_id(),
            length: max_length,
        });

        for peer in peers.into_iter().filter(|p| p.node_id() != local.node_id()) {
            local.events().emit(&LedgerEvent::PeerChecked {
                node_id: local.node_id(),
                peer_id: peer.node_id(),
                length: peer.len(),
            });

            if peer.len() > max_length && peer.is_valid() {
                max_length = peer.len();
                winner = Some(peer);
            }
        }

        match winner {
            Some(peer) => {
                let peer_id = peer.node_id().to_string();
                local.replace_chain(peer.chain().clone());
                Self::announce_replaced(local, &peer_id);
                true
            }
            None => {
                Self::announce_kept(local);
                false
            }
        }
    }

    /// Lock-aware variant for ledgers that other actors may be mining on.
    ///
    /// Each peer is read under its own read lock, so its length and validity
    /// come from one snapshot. The local length is re-checked under the write
    /// lock before swapping, in case local mining overtook the winner.
    pub fn resolve_shared(local: &SharedLedger, peers: &[SharedLedger]) -> bool {
        let (node_id, events, mut max_length) = {
            let ledger = local.read();
            (ledger.node_id().to_string(), Arc::clone(ledger.events()), ledger.len())
        };

        events.emit(&LedgerEvent::ConsensusStarted {
            node_id: &node_id,
            length: max_length,
        });

        let mut winner: Option<(String, Chain)> = None;
        for peer in peers.iter().filter(|p| !Arc::ptr_eq(*p, local)) {
            let peer = peer.read();
            if peer.node_id() == node_id {
                continue;
            }

            events.emit(&LedgerEvent::PeerChecked {
                node_id: &node_id,
                peer_id: peer.node_id(),
                length: peer.len(),
            });

            if peer.len() > max_length && peer.is_valid() {
                max_length = peer.len();
                winner = Some((peer.node_id().to_string(), peer.chain().clone()));
            }
        }

        let mut ledger = local.write();
        match winner {
            Some((peer_id, chain)) if chain.len() > ledger.len() => {
                ledger.replace_chain(chain);
                Self::announce_replaced(&ledger, &peer_id);
                true
            }
            _ => {
                Self::announce_kept(&ledger);
                false
            }
        }
    }

    fn announce_replaced(local: &Ledger, peer_id: &str) {
        local.events().emit(&LedgerEvent::ChainReplaced {
            node_id: local.node_id(),
            peer_id,
            length: local.len(),
        });
    }

    fn announce_kept(local: &Ledger) {
        local.events().emit(&LedgerEvent::ChainKept {
            node_id: local.node_id(),
            length: local.len(),
        });
    }
}
