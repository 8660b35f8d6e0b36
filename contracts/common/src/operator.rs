use soroban_sdk::{symbol_short, Address, Env, Symbol};

// ── Storage Keys ─────────────────────────────────────────────────────────────

const OPERATOR: Symbol = symbol_short!("OPERATOR");
const PENDING_OPERATOR: Symbol = symbol_short!("PEND_OP");

// ── Core Functions ───────────────────────────────────────────────────────────

/// Records `operator` as the address allowed to run privileged entry points.
/// Callers must verify authorization beforehand.
pub fn set_operator(env: &Env, operator: &Address) {
    env.storage().instance().set(&OPERATOR, operator);
}

/// Returns the current operator, if one has been recorded.
pub fn get_operator(env: &Env) -> Option<Address> {
    env.storage().instance().get(&OPERATOR)
}

/// Returns `true` when `caller` is the recorded operator.
pub fn is_operator(env: &Env, caller: &Address) -> bool {
    get_operator(env).is_some_and(|op| op == *caller)
}

// ── Two-step handover ────────────────────────────────────────────────────────

/// Stores `candidate` as the pending operator.
///
/// Returns `false` if `caller` is not the current operator. The caller must
/// have already been authenticated via `require_auth()`.
pub fn propose_operator(env: &Env, caller: &Address, candidate: &Address) -> bool {
    if !is_operator(env, caller) {
        return false;
    }
    env.storage().instance().set(&PENDING_OPERATOR, candidate);
    true
}

/// Returns the pending operator, if a handover is in flight.
pub fn get_pending_operator(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_OPERATOR)
}

/// Completes a handover when `candidate` matches the pending operator.
///
/// Returns the previous operator on success.
pub fn accept_operator(env: &Env, candidate: &Address) -> Option<Address> {
    let pending = get_pending_operator(env)?;
    if pending != *candidate {
        return None;
    }
    let previous = get_operator(env)?;
    set_operator(env, candidate);
    env.storage().instance().remove(&PENDING_OPERATOR);
    Some(previous)
}

/// Drops the pending handover and returns the address that was pending.
pub fn clear_pending_operator(env: &Env) -> Option<Address> {
    let pending = get_pending_operator(env)?;
    env.storage().instance().remove(&PENDING_OPERATOR);
    Some(pending)
}
