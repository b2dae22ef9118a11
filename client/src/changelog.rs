//! Change-log event extraction from confirmed transactions.
//!
//! The compression program does not log its change-log events: it invokes
//! the noop log-wrapper program with the serialized event as instruction
//! data, since CPI instruction data is never truncated. A transaction
//! fetched with JSON encoding therefore carries every change-log event as a
//! base58-encoded inner instruction, and the leaf index of the touched leaf
//! can be recovered from the decoded event.

use {
    crate::{error::ClientError, pda::find_asset_id},
    borsh::BorshDeserialize,
    log::debug,
    solana_program::pubkey::Pubkey,
    solana_transaction_status::{
        option_serializer::OptionSerializer, EncodedConfirmedTransactionWithStatusMeta,
        EncodedTransaction, UiInnerInstructions, UiInstruction, UiMessage,
    },
    spl_account_compression::events::{AccountCompressionEvent, ChangeLogEvent, ChangeLogEventV1},
};

/// A leaf recovered from a transaction's change-log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintedAsset {
    pub tree: Pubkey,
    pub leaf_index: u64,
    pub asset_id: Pubkey,
}

/// Collect every change-log event wrapped in a noop inner instruction.
///
/// Instructions of other programs, undecodable data, and application-data
/// events are skipped. Events are returned in transaction order.
pub fn parse_changelog_events(
    account_keys: &[String],
    inner_instructions: &[UiInnerInstructions],
) -> Vec<ChangeLogEventV1> {
    let noop_id = spl_noop::id().to_string();
    let mut events = vec![];
    for inner in inner_instructions {
        for instruction in &inner.instructions {
            let compiled = match instruction {
                UiInstruction::Compiled(compiled) => compiled,
                _ => continue,
            };
            if account_keys.get(compiled.program_id_index as usize) != Some(&noop_id) {
                continue;
            }
            let data = match bs58::decode(&compiled.data).into_vec() {
                Ok(data) => data,
                Err(_) => continue,
            };
            match AccountCompressionEvent::try_from_slice(&data) {
                Ok(AccountCompressionEvent::ChangeLog(ChangeLogEvent::V1(event))) => {
                    events.push(event)
                }
                Ok(AccountCompressionEvent::ApplicationData(_)) => {}
                Err(err) => debug!("skipping undecodable noop instruction: {}", err),
            }
        }
    }
    events
}

/// Recover the assets touched by a confirmed transaction.
///
/// A mint transaction yields one entry per minted leaf; transactions that
/// carry no change-log events yield an empty vector.
pub fn assets_from_transaction(
    transaction: &EncodedConfirmedTransactionWithStatusMeta,
) -> Result<Vec<MintedAsset>, ClientError> {
    let meta = match &transaction.transaction.meta {
        Some(meta) => meta,
        None => return Ok(vec![]),
    };
    let mut account_keys = match &transaction.transaction.transaction {
        EncodedTransaction::Json(ui_transaction) => match &ui_transaction.message {
            UiMessage::Raw(raw) => raw.account_keys.clone(),
            UiMessage::Parsed(parsed) => parsed
                .account_keys
                .iter()
                .map(|key| key.pubkey.clone())
                .collect(),
        },
        _ => {
            return Err(ClientError::parse(
                "transaction",
                "expected json transaction encoding",
            ))
        }
    };
    // Lookup-table addresses are appended after the static keys.
    if let OptionSerializer::Some(loaded) = &meta.loaded_addresses {
        account_keys.extend(loaded.writable.iter().cloned());
        account_keys.extend(loaded.readonly.iter().cloned());
    }
    let inner_instructions = match &meta.inner_instructions {
        OptionSerializer::Some(inner) => inner.as_slice(),
        _ => &[],
    };

    let assets = parse_changelog_events(&account_keys, inner_instructions)
        .into_iter()
        .map(|event| {
            let leaf_index = u64::from(event.index);
            let (asset_id, _) = find_asset_id(&event.id, leaf_index);
            MintedAsset {
                tree: event.id,
                leaf_index,
                asset_id,
            }
        })
        .collect();
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        borsh::BorshSerialize,
        solana_program::message::MessageHeader,
        solana_transaction_status::{
            EncodedTransactionWithStatusMeta, UiCompiledInstruction, UiRawMessage, UiTransaction,
            UiTransactionStatusMeta,
        },
        spl_account_compression::{
            events::{ApplicationDataEvent, ApplicationDataEventV1},
            state::PathNode,
        },
    };

    fn changelog_event(tree: Pubkey, index: u32) -> ChangeLogEventV1 {
        ChangeLogEventV1 {
            id: tree,
            path: vec![PathNode {
                node: [7u8; 32],
                index: (1 << 14) + index,
            }],
            seq: 42,
            index,
        }
    }

    fn noop_instruction_data(event: &AccountCompressionEvent) -> String {
        bs58::encode(event.try_to_vec().unwrap()).into_string()
    }

    fn compiled(program_id_index: u8, data: String) -> UiInstruction {
        UiInstruction::Compiled(UiCompiledInstruction {
            program_id_index,
            accounts: vec![],
            data,
            stack_height: None,
        })
    }

    #[test]
    fn recovers_leaf_index_from_noop_instruction() {
        let tree = Pubkey::new_unique();
        let account_keys = vec![Pubkey::new_unique().to_string(), spl_noop::id().to_string()];
        let event =
            AccountCompressionEvent::ChangeLog(ChangeLogEvent::V1(changelog_event(tree, 5)));
        let inner = vec![UiInnerInstructions {
            index: 0,
            instructions: vec![compiled(1, noop_instruction_data(&event))],
        }];

        let events = parse_changelog_events(&account_keys, &inner);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, tree);
        assert_eq!(events[0].index, 5);
    }

    #[test]
    fn skips_foreign_and_undecodable_instructions() {
        let tree = Pubkey::new_unique();
        let account_keys = vec![Pubkey::new_unique().to_string(), spl_noop::id().to_string()];
        let event =
            AccountCompressionEvent::ChangeLog(ChangeLogEvent::V1(changelog_event(tree, 9)));
        let application_data =
            AccountCompressionEvent::ApplicationData(ApplicationDataEvent::V1(
                ApplicationDataEventV1 {
                    application_data: vec![1, 2, 3],
                },
            ));
        let inner = vec![UiInnerInstructions {
            index: 0,
            instructions: vec![
                // Same payload under a non-noop program is ignored.
                compiled(0, noop_instruction_data(&event)),
                compiled(1, "not-base58!".to_string()),
                compiled(1, bs58::encode([0u8; 3]).into_string()),
                compiled(1, noop_instruction_data(&application_data)),
                compiled(1, noop_instruction_data(&event)),
            ],
        }];

        let events = parse_changelog_events(&account_keys, &inner);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].index, 9);
    }

    #[test]
    fn derives_asset_ids_from_transaction() {
        let tree = Pubkey::new_unique();
        let payer = Pubkey::new_unique();
        let event =
            AccountCompressionEvent::ChangeLog(ChangeLogEvent::V1(changelog_event(tree, 3)));

        let message = UiMessage::Raw(UiRawMessage {
            header: MessageHeader {
                num_required_signatures: 1,
                num_readonly_signed_accounts: 0,
                num_readonly_unsigned_accounts: 1,
            },
            account_keys: vec![payer.to_string(), spl_noop::id().to_string()],
            recent_blockhash: solana_program::hash::Hash::default().to_string(),
            instructions: vec![],
            address_table_lookups: None,
        });
        let meta = UiTransactionStatusMeta {
            err: None,
            status: Ok(()),
            fee: 5000,
            pre_balances: vec![],
            post_balances: vec![],
            inner_instructions: OptionSerializer::Some(vec![UiInnerInstructions {
                index: 0,
                instructions: vec![compiled(1, noop_instruction_data(&event))],
            }]),
            log_messages: OptionSerializer::None,
            pre_token_balances: OptionSerializer::None,
            post_token_balances: OptionSerializer::None,
            rewards: OptionSerializer::None,
            loaded_addresses: OptionSerializer::None,
            return_data: OptionSerializer::None,
            compute_units_consumed: OptionSerializer::None,
        };
        let transaction = EncodedConfirmedTransactionWithStatusMeta {
            slot: 0,
            transaction: EncodedTransactionWithStatusMeta {
                transaction: EncodedTransaction::Json(UiTransaction {
                    signatures: vec![],
                    message,
                }),
                meta: Some(meta),
                version: None,
            },
            block_time: None,
        };

        let assets = assets_from_transaction(&transaction).unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].tree, tree);
        assert_eq!(assets[0].leaf_index, 3);
        assert_eq!(assets[0].asset_id, find_asset_id(&tree, 3).0);
    }

    #[test]
    fn transaction_without_meta_yields_nothing() {
        let transaction = EncodedConfirmedTransactionWithStatusMeta {
            slot: 0,
            transaction: EncodedTransactionWithStatusMeta {
                transaction: EncodedTransaction::Json(UiTransaction {
                    signatures: vec![],
                    message: UiMessage::Raw(UiRawMessage {
                        header: MessageHeader::default(),
                        account_keys: vec![],
                        recent_blockhash: solana_program::hash::Hash::default().to_string(),
                        instructions: vec![],
                        address_table_lookups: None,
                    }),
                }),
                meta: None,
                version: None,
            },
            block_time: None,
        };
        assert!(assets_from_transaction(&transaction).unwrap().is_empty());
    }
}
