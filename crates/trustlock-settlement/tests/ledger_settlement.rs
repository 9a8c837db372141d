//! Settlement primitive driven against the reference ledger.
//!
//! Randomized fund/settle sequences must conserve supply and pay every
//! escrow out exactly once.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use trustlock_settlement::{settle, Ledger, Vault};
use trustlock_types::{Address, EscrowId, EscrowState, Timestamp};

struct Slot {
    id: EscrowId,
    vault: Vault,
    state: EscrowState,
    depositor: Address,
    beneficiary: Address,
}

#[test]
fn random_sequences_conserve_supply() {
    let mut rng = StdRng::seed_from_u64(0x7157);
    let mut ledger = Ledger::default();

    let parties: Vec<Address> = (0..6).map(|i| Address::from_label(&format!("p{i}"))).collect();
    for p in &parties {
        ledger.mint(*p, 1_000_000).unwrap();
    }

    let mut slots: Vec<Slot> = (0..40u64)
        .map(|i| {
            let d = rng.gen_range(0..parties.len());
            let b = (d + 1 + rng.gen_range(0..parties.len() - 1)) % parties.len();
            Slot {
                id: EscrowId(i),
                vault: Vault::new(),
                state: EscrowState::Init,
                depositor: parties[d],
                beneficiary: parties[b],
            }
        })
        .collect();

    let mut payouts = 0usize;
    for step in 0..400u64 {
        let slot = &mut slots[rng.gen_range(0..40)];
        let now = Timestamp(step);
        match slot.state {
            EscrowState::Init => {
                let amount = rng.gen_range(1..5_000);
                if ledger.lock(slot.id, slot.depositor, amount).is_ok() {
                    slot.vault.deposit(amount).unwrap();
                    slot.state = EscrowState::Funded;
                }
            }
            EscrowState::Funded => {
                let (terminal, to) = if rng.gen_bool(0.5) {
                    (EscrowState::Released, slot.beneficiary)
                } else {
                    (EscrowState::Refunded, slot.depositor)
                };
                let held = slot.vault.balance();
                let receipt = settle(
                    slot.id,
                    &mut slot.vault,
                    &mut slot.state,
                    terminal,
                    to,
                    now,
                    &mut ledger,
                )
                .unwrap();
                assert_eq!(receipt.amount, held);
                payouts += 1;
            }
            EscrowState::Released | EscrowState::Refunded => {
                let to = slot.beneficiary;
                let before = slot.state;
                let again = settle(
                    slot.id,
                    &mut slot.vault,
                    &mut slot.state,
                    EscrowState::Released,
                    to,
                    now,
                    &mut ledger,
                );
                assert!(again.is_err());
                assert_eq!(slot.state, before);
            }
        }
        ledger.verify_supply().unwrap();
    }

    assert_eq!(ledger.settlement_log().len(), payouts);
    for slot in &slots {
        assert_eq!(ledger.held(slot.id), slot.vault.balance());
    }
}
