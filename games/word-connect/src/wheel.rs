//! Letter wheel gesture state.
//!
//! One state machine replaces the scattered "dragging / locked / tutorial"
//! flags: every transition is a method that returns whether it was accepted,
//! and refused transitions change nothing.

use glam::Vec2;
use wheel_engine::GameRng;

/// Stable handle to a letter token. Survives shuffles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterToken {
    pub letter: char,
    /// Position around the wheel, 0 at the top, clockwise.
    pub slot: usize,
}

/// Who is driving a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Pointer,
    Tutorial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialPhase {
    /// Hand demonstrates the path; nothing selected yet.
    Preview,
    /// Tutorial word was released; guide fading out.
    Outro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WheelState {
    #[default]
    Idle,
    Dragging(Driver),
    Tutorial(TutorialPhase),
    /// Wrong-answer cooldown.
    Locked,
}

#[derive(Debug, Clone)]
pub struct Wheel {
    tokens: Vec<LetterToken>,
    selection: Vec<TokenId>,
    state: WheelState,
}

/// Offset of `slot` out of `count` on a circle of `radius`, first slot at the top.
pub fn slot_position(slot: usize, count: usize, radius: f32) -> Vec2 {
    if count == 0 {
        return Vec2::ZERO;
    }
    let step = std::f32::consts::TAU / count as f32;
    let angle = slot as f32 * step - std::f32::consts::FRAC_PI_2;
    Vec2::from_angle(angle) * radius
}

impl Wheel {
    pub fn new(letters: &[char]) -> Self {
        let tokens = letters
            .iter()
            .enumerate()
            .map(|(slot, &letter)| LetterToken { letter, slot })
            .collect();
        Self {
            tokens,
            selection: Vec::new(),
            state: WheelState::Idle,
        }
    }

    pub fn state(&self) -> WheelState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == WheelState::Locked
    }

    /// A tutorial owns the wheel (including its synthetic drag).
    pub fn in_tutorial(&self) -> bool {
        matches!(
            self.state,
            WheelState::Tutorial(_) | WheelState::Dragging(Driver::Tutorial)
        )
    }

    pub fn token(&self, id: TokenId) -> Option<&LetterToken> {
        self.tokens.get(id.0)
    }

    pub fn tokens(&self) -> impl Iterator<Item = (TokenId, &LetterToken)> {
        self.tokens.iter().enumerate().map(|(i, t)| (TokenId(i), t))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn selection(&self) -> &[TokenId] {
        &self.selection
    }

    pub fn is_selected(&self, id: TokenId) -> bool {
        self.selection.contains(&id)
    }

    /// Letters of the current selection.
    pub fn word(&self) -> String {
        self.selection
            .iter()
            .filter_map(|&id| self.token(id))
            .map(|t| t.letter)
            .collect()
    }

    /// Tokens in on-screen order (by slot).
    pub fn order(&self) -> Vec<TokenId> {
        let mut ids: Vec<TokenId> = (0..self.tokens.len()).map(TokenId).collect();
        ids.sort_by_key(|id| self.tokens[id.0].slot);
        ids
    }

    /// Start a drag on `id`. Cancels a running tutorial. Refused while locked.
    pub fn press(&mut self, id: TokenId) -> bool {
        if self.is_locked() || self.token(id).is_none() {
            return false;
        }
        self.selection.clear();
        self.selection.push(id);
        self.state = WheelState::Dragging(Driver::Pointer);
        true
    }

    /// Extend the drag. Tokens already in the path are ignored.
    pub fn enter(&mut self, id: TokenId) -> bool {
        if !matches!(self.state, WheelState::Dragging(_))
            || self.token(id).is_none()
            || self.is_selected(id)
        {
            return false;
        }
        self.selection.push(id);
        true
    }

    /// End the drag and return the formed word. The selection stays visible
    /// until the answer is judged.
    pub fn release(&mut self) -> Option<String> {
        self.state = match self.state {
            WheelState::Dragging(Driver::Pointer) => WheelState::Idle,
            WheelState::Dragging(Driver::Tutorial) => WheelState::Tutorial(TutorialPhase::Outro),
            _ => return None,
        };
        Some(self.word())
    }

    pub fn begin_tutorial(&mut self) -> bool {
        if self.state != WheelState::Idle {
            return false;
        }
        self.selection.clear();
        self.state = WheelState::Tutorial(TutorialPhase::Preview);
        true
    }

    /// Tutorial switches from demonstrating to dragging, starting at `first`.
    pub fn begin_trace(&mut self, first: TokenId) -> bool {
        if self.state != WheelState::Tutorial(TutorialPhase::Preview) || self.token(first).is_none() {
            return false;
        }
        self.selection.clear();
        self.selection.push(first);
        self.state = WheelState::Dragging(Driver::Tutorial);
        true
    }

    /// Tutorial played out normally.
    pub fn finish_tutorial(&mut self) -> bool {
        if self.state != WheelState::Tutorial(TutorialPhase::Outro) {
            return false;
        }
        self.selection.clear();
        self.state = WheelState::Idle;
        true
    }

    /// Abort a tutorial in any phase.
    pub fn cancel_tutorial(&mut self) -> bool {
        if !self.in_tutorial() {
            return false;
        }
        self.selection.clear();
        self.state = WheelState::Idle;
        true
    }

    /// Enter the wrong-answer cooldown. Refused while already locked, so
    /// cooldowns never stack.
    pub fn lock(&mut self) -> bool {
        match self.state {
            WheelState::Idle | WheelState::Tutorial(TutorialPhase::Outro) => {
                self.state = WheelState::Locked;
                true
            }
            _ => false,
        }
    }

    pub fn unlock(&mut self) -> bool {
        if !self.is_locked() {
            return false;
        }
        self.selection.clear();
        self.state = WheelState::Idle;
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Reassign slots with a Fisher–Yates shuffle of the on-screen order.
    pub fn shuffle(&mut self, rng: &mut GameRng) -> bool {
        if matches!(self.state, WheelState::Locked | WheelState::Dragging(_)) {
            return false;
        }
        let mut order = self.order();
        rng.shuffle(&mut order);
        for (slot, id) in order.into_iter().enumerate() {
            self.tokens[id.0].slot = slot;
        }
        true
    }

    /// Tokens spelling `word`: for each letter, the first unused token in
    /// on-screen order. Letters the wheel cannot supply are skipped.
    pub fn tutorial_path(&self, word: &str) -> Vec<TokenId> {
        let order = self.order();
        let mut path: Vec<TokenId> = Vec::with_capacity(word.len());
        for letter in word.chars() {
            let found = order
                .iter()
                .copied()
                .find(|id| self.tokens[id.0].letter == letter && !path.contains(id));
            if let Some(id) = found {
                path.push(id);
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn wheel() -> Wheel {
        Wheel::new(&['G', 'O', 'D', 'L'])
    }

    fn drag(wheel: &mut Wheel, path: &[usize]) -> Option<String> {
        wheel.press(TokenId(path[0]));
        for &i in &path[1..] {
            wheel.enter(TokenId(i));
        }
        wheel.release()
    }

    #[test]
    fn drag_spells_word() {
        let mut w = wheel();
        assert_eq!(drag(&mut w, &[0, 1, 2]).as_deref(), Some("GOD"));
        assert_eq!(w.state(), WheelState::Idle);
        assert_eq!(drag(&mut w, &[2, 1, 0]).as_deref(), Some("DOG"));
    }

    #[test]
    fn revisiting_a_token_is_ignored() {
        let mut w = wheel();
        w.press(TokenId(0));
        assert!(w.enter(TokenId(1)));
        assert!(!w.enter(TokenId(0)));
        assert!(!w.enter(TokenId(1)));
        assert_eq!(w.word(), "GO");
    }

    #[test]
    fn enter_without_drag_is_ignored() {
        let mut w = wheel();
        assert!(!w.enter(TokenId(1)));
        assert!(w.release().is_none());
        assert!(w.selection().is_empty());
    }

    #[test]
    fn locked_wheel_refuses_everything() {
        let mut w = wheel();
        assert!(w.lock());
        assert!(!w.lock());
        assert!(!w.press(TokenId(0)));
        assert!(!w.enter(TokenId(0)));
        assert!(w.release().is_none());
        assert!(!w.begin_tutorial());
        assert!(!w.shuffle(&mut GameRng::new(1)));
        assert!(w.unlock());
        assert!(!w.unlock());
        assert_eq!(w.state(), WheelState::Idle);
    }

    #[test]
    fn tutorial_runs_through_its_phases() {
        let mut w = wheel();
        assert!(w.begin_tutorial());
        assert!(!w.begin_tutorial());
        assert!(w.begin_trace(TokenId(1)));
        assert_eq!(w.state(), WheelState::Dragging(Driver::Tutorial));
        assert!(w.enter(TokenId(3)));
        assert!(w.enter(TokenId(0)));
        assert_eq!(w.release().as_deref(), Some("OLG"));
        assert_eq!(w.state(), WheelState::Tutorial(TutorialPhase::Outro));
        assert!(w.finish_tutorial());
        assert_eq!(w.state(), WheelState::Idle);
        assert!(w.selection().is_empty());
    }

    #[test]
    fn press_cancels_tutorial() {
        let mut w = wheel();
        w.begin_tutorial();
        w.begin_trace(TokenId(0));
        w.enter(TokenId(1));
        assert!(w.press(TokenId(2)));
        assert_eq!(w.state(), WheelState::Dragging(Driver::Pointer));
        assert_eq!(w.selection(), &[TokenId(2)]);
    }

    #[test]
    fn tutorial_needs_idle_wheel() {
        let mut w = wheel();
        w.press(TokenId(0));
        assert!(!w.begin_tutorial());
        assert!(!w.cancel_tutorial());
    }

    #[test]
    fn outro_can_be_locked() {
        let mut w = wheel();
        w.begin_tutorial();
        w.begin_trace(TokenId(0));
        w.release();
        assert!(w.lock());
        assert!(!w.finish_tutorial());
        assert!(w.unlock());
    }

    #[test]
    fn shuffle_refused_mid_drag() {
        let mut w = wheel();
        w.press(TokenId(0));
        assert!(!w.shuffle(&mut GameRng::new(1)));
    }

    #[test]
    fn tutorial_path_follows_screen_order() {
        let mut w = Wheel::new(&['O', 'G', 'O', 'D']);
        let path = w.tutorial_path("GOOD");
        assert_eq!(path, vec![TokenId(1), TokenId(0), TokenId(2), TokenId(3)]);

        // No L on this wheel.
        assert_eq!(w.tutorial_path("LOL"), vec![TokenId(0)]);

        w.shuffle(&mut GameRng::new(9));
        let order = w.order();
        let first_o = order.iter().copied().find(|id| w.token(*id).unwrap().letter == 'O').unwrap();
        assert_eq!(w.tutorial_path("O"), vec![first_o]);
    }

    #[test]
    fn slots_start_at_the_top() {
        let top = slot_position(0, 4, 85.0);
        assert!(top.x.abs() < 1e-4 && (top.y + 85.0).abs() < 1e-4);
        let right = slot_position(1, 4, 85.0);
        assert!((right.x - 85.0).abs() < 1e-4 && right.y.abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn selection_never_repeats(path in prop::collection::vec(0usize..4, 1..12)) {
            let mut w = wheel();
            w.press(TokenId(path[0]));
            for &i in &path[1..] {
                w.enter(TokenId(i));
            }
            let sel = w.selection().to_vec();
            let mut dedup = sel.clone();
            dedup.sort();
            dedup.dedup();
            prop_assert_eq!(sel.len(), dedup.len());
        }

        #[test]
        fn shuffle_is_a_permutation(seed in any::<u64>(), rounds in 1usize..5) {
            let mut w = Wheel::new(&['G', 'O', 'D', 'L', 'O']);
            let mut rng = GameRng::new(seed);
            for _ in 0..rounds {
                prop_assert!(w.shuffle(&mut rng));
            }
            let mut slots: Vec<usize> = w.tokens().map(|(_, t)| t.slot).collect();
            slots.sort_unstable();
            prop_assert_eq!(slots, vec![0, 1, 2, 3, 4]);
            let mut letters: Vec<char> = w.order().iter().map(|id| w.token(*id).unwrap().letter).collect();
            letters.sort_unstable();
            prop_assert_eq!(letters, vec!['D', 'G', 'L', 'O', 'O']);
        }
    }
}
