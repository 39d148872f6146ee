//! Frame-driven animation state machines.
//!
//! Every animated species shares one finite-state update/transition
//! algorithm; only the per-species tables differ (frames per state, which
//! states loop, which are self-terminating actions). The tables live on the
//! species state enums via [`AnimState`], and [`SpriteAnimation`] is the
//! single parametrized machine over them.
//!
//! Texture coordinates are a pure function of (state, direction, frame,
//! sheet dimensions) and are recomputed at every draw, never stored.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Seconds each sprite frame is shown.
pub const FRAME_TIME: f32 = 0.2;

/// Number of facing directions per state (one sheet row each).
const DIRECTION_COUNT: u32 = 4;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// 4-way facing direction; doubles as the row offset within a state block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Down = 0,
    Left = 1,
    Right = 2,
    Up = 3,
}

// ---------------------------------------------------------------------------
// AnimState
// ---------------------------------------------------------------------------

/// Per-species animation table: frame counts, looping, action and dead
/// flags, and the canonical fallback states.
pub trait AnimState: Copy + Eq {
    /// Frames in this state's row.
    fn max_frames(self) -> u32;

    /// Whether the state wraps back to frame 0 on overflow.
    fn loops(self) -> bool;

    /// Whether the state is a self-terminating action (attack, block, cast).
    fn is_action(self) -> bool {
        false
    }

    /// Whether this is the death state (last frame is held forever).
    fn is_dead(self) -> bool;

    /// Row-block index of the state within the sprite sheet.
    fn state_index(self) -> u32;

    /// The state a finished non-looping animation falls back to.
    fn idle() -> Self;

    /// The state a finished action transitions to while moving.
    fn walk() -> Self;

    /// The species' sprite sheet layout.
    fn sheet() -> SpriteSheet;
}

// ---------------------------------------------------------------------------
// SpriteSheet
// ---------------------------------------------------------------------------

/// Sprite sheet dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub sprite_size: u32,
    pub width: u32,
    pub height: u32,
}

// ---------------------------------------------------------------------------
// SpriteAnimation
// ---------------------------------------------------------------------------

/// The shared finite-state, frame-driven animation machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteAnimation<S> {
    pub state: S,
    pub direction: Direction,
    pub frame: u32,
    /// Elapsed time within the current frame, seconds.
    elapsed: f32,
    sheet: SpriteSheet,
    /// Whether movement input is held; decides the post-action fallback.
    pub is_walking: bool,
    /// Gate for the direction-only-update rule during actions; cleared when
    /// an action animation self-terminates.
    pub can_attack: bool,
}

impl<S: AnimState> SpriteAnimation<S> {
    /// A machine in the species' idle state, facing right.
    pub fn new() -> Self {
        Self {
            state: S::idle(),
            direction: Direction::Right,
            frame: 0,
            elapsed: 0.0,
            sheet: S::sheet(),
            is_walking: false,
            can_attack: true,
        }
    }

    /// Advance the frame timer by `elapsed_ms`.
    ///
    /// When the timer crosses [`FRAME_TIME`] the frame index advances, with
    /// the overflow policy: looping states wrap to 0; an action state in
    /// progress self-terminates into Walk (if moving) or Idle and clears the
    /// `can_attack` gate; Dead holds its last frame forever; anything else
    /// falls back to Idle.
    pub fn update(&mut self, elapsed_ms: f32) {
        self.elapsed += elapsed_ms / 1000.0;
        if self.elapsed < FRAME_TIME {
            return;
        }
        self.elapsed = 0.0;

        let max_frames = self.state.max_frames();
        if !(self.state.is_dead() && self.frame >= max_frames.saturating_sub(1)) {
            self.frame += 1;
        }

        if self.state.is_action() {
            if self.frame >= max_frames {
                self.can_attack = false;
                let next = if self.is_walking { S::walk() } else { S::idle() };
                self.set_state(next, self.direction);
            }
        } else if self.frame >= max_frames {
            if self.state.loops() {
                self.frame = 0;
            } else if !self.state.is_dead() {
                self.set_state(S::idle(), self.direction);
            } else {
                self.frame = max_frames.saturating_sub(1);
            }
        }
    }

    /// Request a state/direction transition.
    ///
    /// A no-op unless the incoming pair differs from the current one; on an
    /// actual transition the frame index and frame timer reset. While an
    /// action is in flight and the `can_attack` gate is set, a request to
    /// transition to Walk is honored only as a direction update, so the
    /// character can turn without interrupting the action.
    pub fn set_state(&mut self, new_state: S, new_direction: Direction) {
        if self.state == S::walk() && new_state.is_action() {
            self.is_walking = true;
            self.can_attack = true;
        }

        if self.state.is_action() && self.can_attack && new_state == S::walk() {
            self.direction = new_direction;
            self.is_walking = true;
            return;
        }

        if new_state != self.state || new_direction != self.direction {
            self.state = new_state;
            self.direction = new_direction;
            self.frame = 0;
            self.elapsed = 0.0;
        }
    }

    /// Sheet row of the current (state, direction) pair.
    pub fn row(&self) -> u32 {
        self.state.state_index() * DIRECTION_COUNT + self.direction as u32
    }

    /// Texture coordinates of the current frame as `(top_left,
    /// bottom_right)` fractions of the sheet.
    pub fn tex_coords(&self) -> (Vec2, Vec2) {
        let frame_width = self.sheet.sprite_size as f32 / self.sheet.width as f32;
        let frame_height = self.sheet.sprite_size as f32 / self.sheet.height as f32;
        let row = self.row() as f32;
        let frame = self.frame as f32;

        let top_left = Vec2::new(frame * frame_width, row * frame_height);
        let bottom_right = Vec2::new((frame + 1.0) * frame_width, (row + 1.0) * frame_height);
        (top_left, bottom_right)
    }
}

impl<S: AnimState> Default for SpriteAnimation<S> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Species tables
// ---------------------------------------------------------------------------

/// Player states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Idle = 0,
    Attack = 1,
    Block = 2,
    Dead = 3,
    /// Ranged projectile cast.
    Proj = 4,
    /// Secondary melee attack.
    Second = 5,
    Walk = 6,
}

impl AnimState for PlayerState {
    fn max_frames(self) -> u32 {
        match self {
            PlayerState::Idle => 3,
            PlayerState::Attack => 7,
            PlayerState::Block => 5,
            PlayerState::Dead => 7,
            PlayerState::Proj => 6,
            PlayerState::Second => 7,
            PlayerState::Walk => 5,
        }
    }

    fn loops(self) -> bool {
        matches!(self, PlayerState::Idle | PlayerState::Walk)
    }

    fn is_action(self) -> bool {
        matches!(
            self,
            PlayerState::Attack | PlayerState::Block | PlayerState::Proj | PlayerState::Second
        )
    }

    fn is_dead(self) -> bool {
        self == PlayerState::Dead
    }

    fn state_index(self) -> u32 {
        self as u32
    }

    fn idle() -> Self {
        PlayerState::Idle
    }

    fn walk() -> Self {
        PlayerState::Walk
    }

    fn sheet() -> SpriteSheet {
        SpriteSheet {
            sprite_size: 64,
            width: 448,
            height: 1280,
        }
    }
}

/// Generic ground-robot states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotState {
    Walk = 0,
    Idle = 1,
    Dead = 2,
    Hurt = 3,
    Attack = 4,
}

impl AnimState for RobotState {
    fn max_frames(self) -> u32 {
        match self {
            RobotState::Walk => 7,
            RobotState::Idle => 4,
            RobotState::Dead => 8,
            RobotState::Hurt => 3,
            RobotState::Attack => 10,
        }
    }

    fn loops(self) -> bool {
        self == RobotState::Walk
    }

    fn is_dead(self) -> bool {
        self == RobotState::Dead
    }

    fn state_index(self) -> u32 {
        self as u32
    }

    fn idle() -> Self {
        RobotState::Idle
    }

    fn walk() -> Self {
        RobotState::Walk
    }

    fn sheet() -> SpriteSheet {
        SpriteSheet {
            sprite_size: 64,
            width: 640,
            height: 1280,
        }
    }
}

/// Ice robot states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IceRobotState {
    Walk = 0,
    Attack = 1,
    Idle = 2,
    Dead = 3,
}

impl AnimState for IceRobotState {
    fn max_frames(self) -> u32 {
        match self {
            IceRobotState::Walk => 9,
            IceRobotState::Attack => 13,
            IceRobotState::Idle => 5,
            IceRobotState::Dead => 5,
        }
    }

    fn loops(self) -> bool {
        self == IceRobotState::Walk
    }

    fn is_dead(self) -> bool {
        self == IceRobotState::Dead
    }

    fn state_index(self) -> u32 {
        self as u32
    }

    fn idle() -> Self {
        IceRobotState::Idle
    }

    fn walk() -> Self {
        IceRobotState::Walk
    }

    fn sheet() -> SpriteSheet {
        SpriteSheet {
            sprite_size: 64,
            width: 832,
            height: 1024,
        }
    }
}

/// Boss robot states. The boss has no death row; every state loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossRobotState {
    Attack = 0,
    Idle = 1,
    Walk = 2,
}

impl AnimState for BossRobotState {
    fn max_frames(self) -> u32 {
        match self {
            BossRobotState::Attack => 12,
            BossRobotState::Idle => 10,
            BossRobotState::Walk => 14,
        }
    }

    fn loops(self) -> bool {
        true
    }

    fn is_dead(self) -> bool {
        false
    }

    fn state_index(self) -> u32 {
        self as u32
    }

    fn idle() -> Self {
        BossRobotState::Idle
    }

    fn walk() -> Self {
        BossRobotState::Walk
    }

    fn sheet() -> SpriteSheet {
        SpriteSheet {
            sprite_size: 128,
            width: 1792,
            height: 384,
        }
    }
}

/// Spider robot states; shares the generic robot's frame layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpiderRobotState {
    Walk = 0,
    Idle = 1,
    Dead = 2,
    Hurt = 3,
    Attack = 4,
}

impl AnimState for SpiderRobotState {
    fn max_frames(self) -> u32 {
        match self {
            SpiderRobotState::Walk => 7,
            SpiderRobotState::Idle => 4,
            SpiderRobotState::Dead => 8,
            SpiderRobotState::Hurt => 3,
            SpiderRobotState::Attack => 10,
        }
    }

    fn loops(self) -> bool {
        self == SpiderRobotState::Walk
    }

    fn is_dead(self) -> bool {
        self == SpiderRobotState::Dead
    }

    fn state_index(self) -> u32 {
        self as u32
    }

    fn idle() -> Self {
        SpiderRobotState::Idle
    }

    fn walk() -> Self {
        SpiderRobotState::Walk
    }

    fn sheet() -> SpriteSheet {
        SpriteSheet {
            sprite_size: 64,
            width: 640,
            height: 1280,
        }
    }
}

// ---------------------------------------------------------------------------
// DoorAnimation
// ---------------------------------------------------------------------------

/// A one-row, six-frame opening animation. Unlike the species machines it
/// has no direction or state table; it only plays forward while
/// `is_opening` is set and holds the final frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorAnimation {
    pub current_frame: u32,
    elapsed: f32,
    pub is_opening: bool,
}

impl DoorAnimation {
    const LAST_FRAME: u32 = 5;

    pub fn new() -> Self {
        Self {
            current_frame: 0,
            elapsed: 0.0,
            is_opening: false,
        }
    }

    pub fn update(&mut self, elapsed_ms: f32) {
        if !self.is_opening {
            return;
        }
        self.elapsed += elapsed_ms / 1000.0;
        if self.elapsed >= FRAME_TIME {
            self.elapsed = 0.0;
            if self.current_frame < Self::LAST_FRAME {
                self.current_frame += 1;
            }
        }
    }

    /// Whether the door has fully opened.
    pub fn finished(&self) -> bool {
        self.current_frame == Self::LAST_FRAME
    }

    pub fn tex_coords(&self) -> (Vec2, Vec2) {
        let frame_width = 1.0 / 6.0;
        let top_left = Vec2::new(frame_width * self.current_frame as f32, 0.0);
        let bottom_right = Vec2::new(frame_width * (self.current_frame + 1) as f32, 1.0);
        (top_left, bottom_right)
    }
}

impl Default for DoorAnimation {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
