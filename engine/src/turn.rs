//! The game loop, one actor's action per step.

use crate::{prelude::*, Capability};

/// Player commands.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Intent {
    /// Step in a direction, attacks a monster standing there.
    Move(IVec2),
    /// Attack in a direction, or any adjacent monster.
    Attack(Option<IVec2>),
    /// Start resting, runs on wall-clock time until interrupted.
    Rest,
    ToggleAutoCombat,
    /// Loot a corpse underfoot or next to the player.
    Loot,
    /// Open an adjacent chest.
    Interact,
    /// Pass a turn.
    Wait,
}

impl Intent {
    /// Intents handled right away without using up the player's turn.
    fn is_instant(self) -> bool {
        matches!(self, Intent::Rest | Intent::ToggleAutoCombat)
    }
}

/// What happened during a step.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Step {
    /// Nobody is scheduled.
    Idle,
    /// It's the player's turn and there's nothing to do.
    AwaitingInput,
    Acted(Entity),
    /// The actor was stunned and lost its turn.
    Skipped(Entity),
    /// The player is dead.
    GameOver,
}

impl Runtime {
    /// Queue a player command for the coming steps.
    pub fn push_intent(&mut self, intent: Intent) {
        self.intents.push_back(intent);
    }

    /// Advance the game by one actor's action.
    pub fn step(&mut self) -> Step {
        if self.scenario_status() == ScenarioStatus::Lost {
            return Step::GameOver;
        }

        // Input and resting check for hostiles against the current view.
        self.update_fov();
        self.handle_input();
        self.update_rest();

        let Some(next) = self.peek_next() else {
            return Step::Idle;
        };
        // A stunned player loses the turn without waiting for input.
        if next.is_player(self)
            && !next.is_stunned(self)
            && !self.player_ready()
        {
            return Step::AwaitingInput;
        }
        let Some(e) = self.pop_next() else {
            return Step::Idle;
        };

        let ret = if e.is_stunned(self) {
            log::debug!("{} {e} is stunned", e.name(self));
            Step::Skipped(e)
        } else {
            self.dispatch(e);
            Step::Acted(e)
        };
        // Does nothing for actors that are gone.
        self.schedule(e, None);

        self.update_effects();
        self.sweep_dead();
        self.check_cleared();

        if self.scenario_status() == ScenarioStatus::Lost {
            log::info!("Player has died");
            Step::GameOver
        } else {
            ret
        }
    }

    fn handle_input(&mut self) {
        while let Some(&intent) = self.intents.front() {
            if !intent.is_instant() {
                self.cancel_rest();
                break;
            }

            self.intents.pop_front();
            match intent {
                Intent::Rest => self.start_rest(),
                Intent::ToggleAutoCombat => {
                    self.cancel_rest();
                    self.auto_combat = !self.auto_combat;
                    let state = if self.auto_combat { "on" } else { "off" };
                    msg!(self, "Auto-combat {state}.");
                }
                _ => {}
            }
        }
    }

    /// Whether the player has something to do this turn.
    fn player_ready(&self) -> bool {
        self.intents.front().map_or(false, |i| !i.is_instant())
            || (self.auto_combat && self.auto_combat_target().is_some())
    }

    fn dispatch(&mut self, e: Entity) {
        match e.kind(self) {
            ActorKind::Player => self.player_act(e),
            ActorKind::Monster => {
                // Monsters outside the player's view are dormant.
                if e.pos(self).map_or(false, |p| self.in_fov(p)) {
                    e.monster_act(self);
                }
            }
            ActorKind::Projectile => e.fly(self),
            ActorKind::TransientFx => e.vanish(self),
            ActorKind::Inert => {}
            kind @ (ActorKind::Corpse | ActorKind::Chest) => {
                log::warn!("Runtime::dispatch: {kind} {e} was scheduled");
            }
        }
    }

    fn player_act(&mut self, player: Entity) {
        let Some(pos) = player.pos(self) else {
            return;
        };

        match self.intents.pop_front() {
            Some(Intent::Move(dir)) => {
                let dest = pos + dir;
                if let Some(m) = self.monster_at(dest) {
                    player.attack(self, m);
                } else if !player.try_step(self, dir) {
                    log::debug!("Player bumped into {dest}");
                }
            }
            Some(Intent::Attack(dir)) => {
                let target = match dir {
                    Some(dir) => self.monster_at(pos + dir),
                    None => DIR_8
                        .into_iter()
                        .find_map(|d| self.monster_at(pos + d)),
                };
                if let Some(m) = target {
                    player.attack(self, m);
                } else {
                    msg!(self, "Nothing to attack.");
                }
            }
            Some(Intent::Loot) => {
                let corpse = self.lootable_near(pos, ActorKind::Corpse);
                if let Some(corpse) = corpse {
                    corpse.loot(self, player);
                } else {
                    msg!(self, "Nothing to loot here.");
                }
            }
            Some(Intent::Interact) => {
                if let Some(chest) = self.lootable_near(pos, ActorKind::Chest) {
                    chest.loot(self, player);
                } else {
                    msg!(self, "Nothing to open here.");
                }
            }
            Some(Intent::Wait) => {}
            Some(intent @ (Intent::Rest | Intent::ToggleAutoCombat)) => {
                log::warn!("Runtime::player_act: unhandled {intent:?}");
            }
            None => {
                if let Some(target) = self.auto_combat_target() {
                    match target.pos(self) {
                        Some(p) if (p - pos).is_adjacent() => {
                            player.attack(self, target);
                        }
                        Some(p) => {
                            player.step_towards(self, p);
                        }
                        None => {}
                    }
                }
            }
        }
    }

    fn monster_at(&self, pos: IVec2) -> Option<Entity> {
        self.blocker_at(pos).filter(|e| e.is_monster(self))
    }

    /// Lootable prop of the given kind underfoot or next to a position.
    fn lootable_near(&self, pos: IVec2, kind: ActorKind) -> Option<Entity> {
        std::iter::once(IVec2::ZERO)
            .chain(DIR_8)
            .flat_map(move |d| self.actors_at(pos + d))
            .find(|e| e.kind(self) == kind && e.is_lootable(self))
    }

    /// Closest visible monster when auto-combat is on.
    pub fn auto_combat_target(&self) -> Option<Entity> {
        if !self.auto_combat {
            return None;
        }
        let origin = self.player?.pos(self)?;

        self.monsters()
            .filter_map(|m| Some((m, m.pos(self)?)))
            .filter(|(_, p)| self.in_fov(*p))
            .min_by_key(|(m, p)| ((*p - origin).len2(), *m))
            .map(|(m, _)| m)
    }

    fn start_rest(&mut self) {
        let Some(player) = self.player.filter(|p| p.is_alive(self)) else {
            return;
        };
        if self.hostile_in_view() {
            msg!(self, "You can't rest with enemies nearby.");
            return;
        }
        let health = player.health(self);
        if health.current >= health.max {
            msg!(self, "You are already fully rested.");
            return;
        }

        msg!(self, "You rest.");
        self.rest_at = Some(self.now_ms() + self.rules.rest_interval);
    }

    fn cancel_rest(&mut self) {
        if self.rest_at.take().is_some() {
            log::debug!("Resting interrupted");
        }
    }

    /// Heal the resting player for elapsed wall-clock intervals.
    fn update_rest(&mut self) {
        let Some(mut at) = self.rest_at else {
            return;
        };
        let Some(player) = self.player.filter(|p| p.is_alive(self)) else {
            self.rest_at = None;
            return;
        };
        if self.hostile_in_view() {
            self.rest_at = None;
            msg!(self, "Your rest is interrupted.");
            return;
        }

        let now = self.now_ms();
        let interval = self.rules.rest_interval.max(1);
        while at <= now {
            let amount = self.rules.rest_heal;
            if player.heal(self, amount) > 0 {
                let health = player.health(self).current;
                self.emit(Msg::Rest(player, health));
            }

            let health = player.health(self);
            if health.current >= health.max {
                self.rest_at = None;
                msg!(self, "You feel rested.");
                return;
            }
            at += interval;
        }
        self.rest_at = Some(at);
    }

    /// Run death handling for anything left at zero health.
    fn sweep_dead(&mut self) {
        let dead: Vec<Entity> = self
            .live_entities()
            .filter(|e| {
                e.is_active(self)
                    && e.has(self, Capability::Health)
                    && e.health(self).is_dead()
            })
            .collect();

        for e in dead {
            log::warn!("Runtime::sweep_dead: {e} was left at zero health");
            e.die(self);
        }
    }

    fn check_cleared(&mut self) {
        if self.monsters().next().is_some() {
            self.cleared = false;
        } else if !self.cleared {
            self.cleared = true;
            log::info!("Level cleared");
            self.emit(Msg::LevelCleared);
            msg!(self, "The level is clear of monsters.");
        }
    }
}
