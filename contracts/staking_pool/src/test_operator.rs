extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    Address, Env,
};

use crate::config::{PoolConfig, ONE_DAY};
use crate::{ContractError, StakingPoolContract, StakingPoolContractClient};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn setup() -> (Env, StakingPoolContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let token = env.register_stellar_asset_contract_v2(Address::generate(&env));

    let contract_id = env.register(StakingPoolContract, ());
    let client = StakingPoolContractClient::new(&env, &contract_id);

    let operator = Address::generate(&env);
    client.initialize(&operator, &PoolConfig::quick(token.address()));

    StellarAssetClient::new(&env, &token.address()).mint(&contract_id, &1_000_000i128);

    (env, client, operator)
}

// ── Operator gating ──────────────────────────────────────────────────────────

#[test]
fn test_only_operator_starts_staking() {
    let (env, client, operator) = setup();
    let stranger = Address::generate(&env);

    let result = client.try_start_staking(&stranger);
    assert!(matches!(result, Err(Ok(ContractError::Unauthorized))));
    assert_eq!(client.start_time(), None);

    client.start_staking(&operator);
    assert!(client.start_time().is_some());
}

#[test]
fn test_only_operator_sets_precision() {
    let (env, client, operator) = setup();
    let stranger = Address::generate(&env);

    let result = client.try_set_precision(&stranger, &12);
    assert!(matches!(result, Err(Ok(ContractError::Unauthorized))));
    assert_eq!(client.precision(), 6);

    client.set_precision(&operator, &12);
    assert_eq!(client.precision(), 12);
}

#[test]
fn test_only_operator_sweeps() {
    let (env, client, operator) = setup();
    let stranger = Address::generate(&env);

    env.ledger().set_timestamp(100);
    client.start_staking(&operator);
    env.ledger().set_timestamp(100 + 2 * 365 * ONE_DAY);

    let result = client.try_withdraw_residual_balance(&stranger);
    assert!(matches!(result, Err(Ok(ContractError::Unauthorized))));

    assert_eq!(client.withdraw_residual_balance(&operator), 1_000_000);
}

// ── Two-step handover ────────────────────────────────────────────────────────

#[test]
fn test_operator_handover() {
    let (env, client, operator) = setup();
    let successor = Address::generate(&env);

    client.propose_operator(&operator, &successor);
    assert_eq!(client.get_pending_operator(), Some(successor.clone()));
    // nothing changes until the successor accepts
    assert_eq!(client.get_operator(), operator);

    client.accept_operator(&successor);
    assert_eq!(client.get_operator(), successor);
    assert_eq!(client.get_pending_operator(), None);

    let result = client.try_start_staking(&operator);
    assert!(matches!(result, Err(Ok(ContractError::Unauthorized))));
    client.start_staking(&successor);
}

#[test]
fn test_only_operator_proposes() {
    let (env, client, _operator) = setup();
    let stranger = Address::generate(&env);

    let result = client.try_propose_operator(&stranger, &stranger);
    assert!(matches!(result, Err(Ok(ContractError::Unauthorized))));
    assert_eq!(client.get_pending_operator(), None);
}

#[test]
fn test_accept_requires_matching_candidate() {
    let (env, client, operator) = setup();
    let successor = Address::generate(&env);
    let impostor = Address::generate(&env);

    let result = client.try_accept_operator(&successor);
    assert!(matches!(result, Err(Ok(ContractError::PendingOperatorMissing))));

    client.propose_operator(&operator, &successor);
    let result = client.try_accept_operator(&impostor);
    assert!(matches!(result, Err(Ok(ContractError::Unauthorized))));
    assert_eq!(client.get_operator(), operator);
}

#[test]
fn test_cancel_handover() {
    let (env, client, operator) = setup();
    let successor = Address::generate(&env);

    let result = client.try_cancel_operator_transfer(&operator);
    assert!(matches!(result, Err(Ok(ContractError::PendingOperatorMissing))));

    client.propose_operator(&operator, &successor);
    let result = client.try_cancel_operator_transfer(&successor);
    assert!(matches!(result, Err(Ok(ContractError::Unauthorized))));

    client.cancel_operator_transfer(&operator);
    assert_eq!(client.get_pending_operator(), None);

    let result = client.try_accept_operator(&successor);
    assert!(matches!(result, Err(Ok(ContractError::PendingOperatorMissing))));
}

#[test]
fn test_reproposal_replaces_candidate() {
    let (env, client, operator) = setup();
    let first = Address::generate(&env);
    let second = Address::generate(&env);

    client.propose_operator(&operator, &first);
    client.propose_operator(&operator, &second);
    assert_eq!(client.get_pending_operator(), Some(second.clone()));

    let result = client.try_accept_operator(&first);
    assert!(matches!(result, Err(Ok(ContractError::Unauthorized))));
    client.accept_operator(&second);
    assert_eq!(client.get_operator(), second);
}
