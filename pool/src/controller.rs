//! The pool state machine.
//!
//! Every mutating call follows the same shape: open a [`WriteBatch`] over the
//! store, validate and stage every write through the ledger, yield and risk
//! views, then commit the batch and emit one [`PoolEvent`]. A call that fails
//! at any point drops its batch, so the store never sees a partial call.

use btcstake_ledger::Ledger;
use btcstake_risk::RiskTracker;
use btcstake_store::{
    AccountStore, DistributionRecord, PoolState, PoolStateStore, StakeStore, WriteBatch,
};
use btcstake_types::{Amount, PoolParams, Principal, Tick, TokenMetadata};
use btcstake_yield::{Claim, DistributionLedger, YieldEngine};

use crate::config::PoolConfig;
use crate::context::CallContext;
use crate::error::{ConfigError, StakeError};
use crate::event::{EventBus, PoolEvent};

/// Staking pool over any [`StakeStore`] backend.
pub struct PoolController<S> {
    pub(crate) store: S,
    pub(crate) owner: Principal,
    pub(crate) params: PoolParams,
    pub(crate) token: TokenMetadata,
    insurance_at_init: bool,
    engine: YieldEngine,
    events: EventBus,
}

impl<S: StakeStore> PoolController<S> {
    /// Build a controller over `store`.
    ///
    /// A URI in the token config seeds the metadata slot if the store has
    /// none yet; the pool itself starts uninitialized.
    pub fn new(store: S, config: &PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if let Some(uri) = config.token.uri.as_deref() {
            if store.get_token_uri()?.is_none() {
                store.put_token_uri(Some(uri))?;
            }
        }
        tracing::debug!(
            owner = %config.owner,
            ticks_per_period = config.params.ticks_per_period,
            max_yield_rate = %config.params.max_yield_rate,
            "pool controller created"
        );
        Ok(Self {
            store,
            owner: config.owner.clone(),
            params: config.params.clone(),
            token: config.token.clone(),
            insurance_at_init: config.insurance_active,
            engine: YieldEngine::new(config.params.ticks_per_period),
            events: EventBus::new(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    pub fn params(&self) -> &PoolParams {
        &self.params
    }

    /// Register an observer for every event emitted after a commit.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&PoolEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── Mutating operations ─────────────────────────────────────────────

    /// Activate the pool at `rate` basis points. Owner only, once.
    pub fn initialize(&self, ctx: &CallContext, rate: Amount) -> Result<PoolEvent, StakeError> {
        self.execute("initialize", ctx, |batch| {
            self.require_owner(ctx)?;
            let mut state = batch.get_pool_state()?;
            if state.active {
                return Err(StakeError::AlreadyInitialized);
            }
            if rate == 0 {
                return Err(StakeError::InvalidAmount("yield rate must be non-zero"));
            }
            if rate > self.params.max_yield_rate {
                return Err(StakeError::InvalidAmount("yield rate exceeds the maximum"));
            }
            state.active = true;
            state.yield_rate = rate;
            state.last_distribution_tick = ctx.tick;
            state.insurance_active = self.insurance_at_init;
            batch.put_pool_state(&state)?;
            Ok(PoolEvent::PoolInitialized {
                owner: ctx.caller.clone(),
                yield_rate: rate,
                tick: ctx.tick,
            })
        })
    }

    /// Deposit `amount` for the caller.
    pub fn stake(&self, ctx: &CallContext, amount: Amount) -> Result<PoolEvent, StakeError> {
        self.execute("stake", ctx, |batch| {
            let mut state = Self::load_active(batch)?;
            if amount < self.params.minimum_stake {
                return Err(StakeError::MinimumStake {
                    amount,
                    minimum: self.params.minimum_stake,
                });
            }
            if amount == 0 {
                return Err(StakeError::InvalidAmount("stake must be non-zero"));
            }
            let staker = &ctx.caller;
            let balance = Ledger::new(batch).credit(staker, amount)?;
            state.total_staked = state
                .total_staked
                .checked_add(amount)
                .ok_or(StakeError::Overflow)?;

            let risk = RiskTracker::new(batch, self.params.score_unit);
            let risk_score = risk.record_stake(staker, amount)?;
            risk.apply_coverage(staker, amount, state.insurance_active)?;

            batch.put_pool_state(&state)?;
            Ok(PoolEvent::Stake {
                staker: staker.clone(),
                amount,
                balance,
                total_staked: state.total_staked,
                risk_score,
            })
        })
    }

    /// Withdraw `amount`, claiming accrued rewards on the way out.
    ///
    /// The claim runs first against the pre-withdrawal balance. Having
    /// nothing to claim is not an error here; any other claim failure aborts
    /// the whole withdrawal.
    pub fn unstake(&self, ctx: &CallContext, amount: Amount) -> Result<PoolEvent, StakeError> {
        self.execute("unstake", ctx, |batch| {
            let mut state = Self::load_active(batch)?;
            if amount == 0 {
                return Err(StakeError::InvalidAmount("unstake must be non-zero"));
            }
            let staker = &ctx.caller;
            let ledger = Ledger::new(batch);
            let available = ledger.get_balance(staker)?;
            if available < amount {
                return Err(StakeError::InsufficientBalance {
                    needed: amount,
                    available,
                });
            }

            let rewards_claimed = match self.claim_into(batch, &mut state, staker, ctx.tick) {
                Ok(claim) => claim.total,
                Err(StakeError::NoYieldAvailable) => 0,
                Err(e) => return Err(e),
            };

            let balance = ledger.debit(staker, amount)?;
            state.total_staked = state
                .total_staked
                .checked_sub(amount)
                .ok_or(StakeError::Overflow)?;
            RiskTracker::new(batch, self.params.score_unit).apply_coverage(
                staker,
                balance,
                state.insurance_active,
            )?;

            batch.put_pool_state(&state)?;
            Ok(PoolEvent::Unstake {
                staker: staker.clone(),
                amount,
                rewards_claimed,
                balance,
                total_staked: state.total_staked,
            })
        })
    }

    /// Record a pool-wide distribution for the periods elapsed since the last one.
    ///
    /// Only the aggregate `total_yield` and the history move; staker
    /// balances and pending rewards are left alone.
    pub fn distribute_yield(&self, ctx: &CallContext) -> Result<PoolEvent, StakeError> {
        self.execute("distribute_yield", ctx, |batch| {
            self.require_owner(ctx)?;
            let mut state = Self::load_active(batch)?;
            let distribution = self.engine.plan_distribution(&state, ctx.tick)?;

            let replaced = DistributionLedger::new(batch).record(&distribution.record)?;
            if let Some(previous) = replaced {
                tracing::warn!(
                    tick = previous.tick.as_u64(),
                    previous_amount = %previous.amount,
                    "distribution record overwritten"
                );
            }
            distribution.apply_to(&mut state);
            batch.put_pool_state(&state)?;

            Ok(PoolEvent::YieldDistributed {
                tick: distribution.record.tick,
                amount: distribution.record.amount,
                apy: distribution.record.apy,
                elapsed: distribution.elapsed,
                total_yield: state.total_yield,
                total_staked: state.total_staked,
            })
        })
    }

    /// Credit the caller's pending plus accrued rewards into their balance.
    ///
    /// Accrual is measured from the pool's last distribution, so a second
    /// claim before the next distribution pays the same window again.
    pub fn claim_rewards(&self, ctx: &CallContext) -> Result<PoolEvent, StakeError> {
        self.execute("claim_rewards", ctx, |batch| {
            let mut state = Self::load_active(batch)?;
            let staker = &ctx.caller;
            let claim = self.claim_into(batch, &mut state, staker, ctx.tick)?;
            batch.put_pool_state(&state)?;
            Ok(PoolEvent::RewardsClaimed {
                staker: staker.clone(),
                amount: claim.total,
                balance: batch.get_balance(staker)?,
                total_staked: state.total_staked,
            })
        })
    }

    /// Move staked balance between accounts. The caller must be `sender`.
    pub fn transfer(
        &self,
        ctx: &CallContext,
        amount: Amount,
        sender: &Principal,
        recipient: &Principal,
        memo: Option<Vec<u8>>,
    ) -> Result<PoolEvent, StakeError> {
        self.execute("transfer", ctx, |batch| {
            if &ctx.caller != sender {
                return Err(StakeError::Unauthorized);
            }
            let (sender_balance, recipient_balance) =
                Ledger::new(batch).transfer(amount, sender, recipient)?;
            Ok(PoolEvent::Transfer {
                sender: sender.clone(),
                recipient: recipient.clone(),
                amount,
                sender_balance,
                recipient_balance,
                memo,
            })
        })
    }

    /// Turn the pool-level insurance switch on or off. Owner only.
    ///
    /// Existing coverage figures are kept; they are only rewritten by the
    /// next stake or unstake while the switch is on.
    pub fn set_insurance_active(
        &self,
        ctx: &CallContext,
        enabled: bool,
    ) -> Result<PoolEvent, StakeError> {
        self.execute("set_insurance_active", ctx, |batch| {
            self.require_owner(ctx)?;
            let mut state = Self::load_active(batch)?;
            state.insurance_active = enabled;
            batch.put_pool_state(&state)?;
            Ok(PoolEvent::InsuranceUpdated { enabled })
        })
    }

    // ── Read accessors ──────────────────────────────────────────────────

    pub fn balance(&self, who: &Principal) -> Result<Amount, StakeError> {
        Ok(Ledger::new(&self.store).get_balance(who)?)
    }

    pub fn pending_rewards(&self, who: &Principal) -> Result<Amount, StakeError> {
        Ok(Ledger::new(&self.store).get_rewards(who)?)
    }

    pub fn risk_score(&self, who: &Principal) -> Result<Amount, StakeError> {
        Ok(RiskTracker::new(&self.store, self.params.score_unit).get_score(who)?)
    }

    pub fn insurance_coverage(&self, who: &Principal) -> Result<Amount, StakeError> {
        Ok(RiskTracker::new(&self.store, self.params.score_unit).get_coverage(who)?)
    }

    /// Current pool aggregates.
    pub fn pool_stats(&self) -> Result<PoolState, StakeError> {
        Ok(self.store.get_pool_state()?)
    }

    pub fn distribution(&self, tick: Tick) -> Result<Option<DistributionRecord>, StakeError> {
        Ok(DistributionLedger::new(&self.store).get(tick)?)
    }

    /// Every distribution record, oldest first.
    pub fn distribution_history(&self) -> Result<Vec<DistributionRecord>, StakeError> {
        Ok(DistributionLedger::new(&self.store).list()?)
    }

    /// Reserved allowance slot. No operation writes it.
    pub fn allowance(&self, owner: &Principal, spender: &Principal) -> Result<Amount, StakeError> {
        Ok(self.store.get_allowance(owner, spender)?)
    }

    /// What `claim_rewards` would credit to `who` if called at `tick`.
    pub fn claimable_rewards(&self, who: &Principal, tick: Tick) -> Result<Amount, StakeError> {
        let state = self.store.get_pool_state()?;
        if !state.active {
            return Ok(0);
        }
        let ledger = Ledger::new(&self.store);
        let claim = self.engine.claimable(
            &state,
            ledger.get_balance(who)?,
            ledger.get_rewards(who)?,
            tick,
        )?;
        Ok(claim.total)
    }

    /// Whether `total_staked` equals the sum of every balance.
    pub fn conservation_holds(&self) -> Result<bool, StakeError> {
        let state = self.store.get_pool_state()?;
        let balances = Ledger::new(&self.store).total_balances()?;
        Ok(state.total_staked == balances)
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// Run `op` against a fresh batch; commit and emit only if it succeeds.
    pub(crate) fn execute<F>(
        &self,
        op: &'static str,
        ctx: &CallContext,
        f: F,
    ) -> Result<PoolEvent, StakeError>
    where
        F: FnOnce(&WriteBatch<'_, S>) -> Result<PoolEvent, StakeError>,
    {
        let batch = WriteBatch::new(&self.store);
        let event = match f(&batch) {
            Ok(event) => event,
            Err(err) => {
                if err.is_infrastructure() {
                    tracing::warn!(op, caller = %ctx.caller, tick = ctx.tick.as_u64(), code = err.code(), error = %err, "call failed");
                } else {
                    tracing::debug!(op, caller = %ctx.caller, tick = ctx.tick.as_u64(), code = err.code(), error = %err, "call rejected");
                }
                return Err(err);
            }
        };
        let writes = batch.commit()?;
        tracing::info!(
            op,
            caller = %ctx.caller,
            tick = ctx.tick.as_u64(),
            writes,
            event = event.kind(),
            "call committed"
        );
        self.events.emit(&event);
        Ok(event)
    }

    pub(crate) fn require_owner(&self, ctx: &CallContext) -> Result<(), StakeError> {
        if ctx.caller != self.owner {
            return Err(StakeError::OwnerOnly);
        }
        Ok(())
    }

    fn load_active(batch: &WriteBatch<'_, S>) -> Result<PoolState, StakeError> {
        let state = batch.get_pool_state()?;
        if !state.active {
            return Err(StakeError::PoolInactive);
        }
        Ok(state)
    }

    /// Stage a claim for `who`: zero pending rewards and credit the total
    /// into the balance and into `state.total_staked`. The caller stores
    /// `state`.
    fn claim_into(
        &self,
        batch: &WriteBatch<'_, S>,
        state: &mut PoolState,
        who: &Principal,
        now: Tick,
    ) -> Result<Claim, StakeError> {
        let ledger = Ledger::new(batch);
        let claim = self.engine.plan_claim(
            state,
            ledger.get_balance(who)?,
            ledger.get_rewards(who)?,
            now,
        )?;
        let total_staked = state
            .total_staked
            .checked_add(claim.total)
            .ok_or(StakeError::Overflow)?;
        ledger.take_rewards(who)?;
        ledger.credit(who, claim.total)?;
        state.total_staked = total_staked;
        tracing::debug!(
            staker = %who,
            pending = %claim.pending,
            accrued = %claim.accrued,
            "rewards credited"
        );
        Ok(claim)
    }
}
