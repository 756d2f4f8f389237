//! Scene presentation of the crossword board.

use glam::Vec2;
use wheel_engine::*;
use crate::board::{Board, CellId};
use crate::cue::{Animations, Cue};

pub const TILE_SIZE: f32 = 80.0;
pub const TILE_PADDING: f32 = 10.0;
const STEP: f32 = TILE_SIZE + TILE_PADDING;
const LETTER_SIZE: f32 = 48.0;
const FLYER_SIZE: f32 = 50.0;

const FLIGHT_TIME: f32 = 0.5;
const FLIGHT_STAGGER: f32 = 0.1;
const FLIGHT_SCALE: f32 = 0.8;
const POP_TIME: f32 = 0.3;

pub const CREAM: Color = Color::hex(0xFFFAE6);
pub const ORANGE: Color = Color::hex(0xFFA500);
const HIDDEN_LETTER: Color = Color::hex(0xF39C12);

#[derive(Debug, Clone, Copy)]
struct CellNode {
    tile: EntityId,
    letter: EntityId,
    /// Centre relative to the board root.
    center: Vec2,
}

/// Tiles and letters of the board, one node per cell, centred on `root`.
#[derive(Debug)]
pub struct BoardView {
    root: EntityId,
    cells: Vec<CellNode>,
}

impl BoardView {
    pub fn new(board: &Board, at: Vec2, ctx: &mut EngineContext, sprites: &SpriteRegistry) -> Self {
        let root = ctx.spawn_node(None, |e| e.with_tag("board"), LocalTransform::at(at));

        let pivot = board.bounds().map_or(Vec2::ZERO, |(r0, c0, r1, c1)| {
            let min = Vec2::new(c0 as f32, r0 as f32) * STEP;
            let max = Vec2::new(c1 as f32, r1 as f32) * STEP + Vec2::splat(TILE_SIZE);
            (min + max) / 2.0
        });

        let tile_sprite = sprites.sprite("tile").with_tint(CREAM);
        let cells = board
            .cells()
            .map(|(_, cell)| {
                let center = Vec2::new(cell.col as f32, cell.row as f32) * STEP
                    + Vec2::splat(TILE_SIZE / 2.0)
                    - pivot;
                let tile = ctx.spawn_node(
                    Some(root),
                    |e| {
                        e.with_tag("tile")
                            .with_layer(RenderLayer::Board)
                            .with_size(Vec2::splat(TILE_SIZE))
                            .with_sprite(tile_sprite.clone())
                    },
                    LocalTransform::at(center),
                );
                let letter = ctx.spawn_node(
                    Some(tile),
                    |e| {
                        e.with_layer(RenderLayer::Board).with_text(TextComponent::new(
                            cell.expected.to_string(),
                            LETTER_SIZE,
                            HIDDEN_LETTER,
                        ))
                    },
                    LocalTransform::default().hidden(),
                );
                CellNode { tile, letter, center }
            })
            .collect();

        Self { root, cells }
    }

    pub fn root(&self) -> EntityId {
        self.root
    }

    pub fn tile(&self, cell: CellId) -> Option<EntityId> {
        self.cells.get(cell.0).map(|c| c.tile)
    }

    pub fn letter(&self, cell: CellId) -> Option<EntityId> {
        self.cells.get(cell.0).map(|c| c.letter)
    }

    /// Judge `guess` on the board and animate every newly solved cell. With an
    /// `origin` (world space) each letter flies from there to its tile and the
    /// tile is recoloured on landing; without one tiles recolour immediately.
    /// Returns whether the guess matched any placement.
    pub fn check_and_reveal(
        &mut self,
        board: &mut Board,
        guess: &str,
        origin: Option<Vec2>,
        ctx: &mut EngineContext,
        anim: &mut Animations,
    ) -> bool {
        let reveal = board.check_and_reveal(guess);
        for revealed in &reveal.newly_solved {
            let Some(cell) = board.cell(revealed.cell) else { continue };
            match origin {
                Some(origin) => {
                    let delay = revealed.letter_index as f32 * FLIGHT_STAGGER;
                    self.launch(revealed.cell, cell.expected, origin, delay, ctx, anim);
                }
                None => self.paint_solved(revealed.cell, ctx),
            }
        }
        if reveal.matched {
            log::debug!("'{guess}' revealed {} cells", reveal.newly_solved.len());
        }
        reveal.matched
    }

    fn launch(
        &self,
        cell: CellId,
        letter: char,
        origin: Vec2,
        delay: f32,
        ctx: &mut EngineContext,
        anim: &mut Animations,
    ) {
        let Some(node) = self.cells.get(cell.0).copied() else { return };
        let start = ctx.graph.to_local(self.root, origin);
        let flyer = ctx.spawn_node(
            Some(self.root),
            |e| {
                e.with_tag("flyer")
                    .with_layer(RenderLayer::Effects)
                    .with_text(TextComponent::new(letter.to_string(), FLYER_SIZE, Color::WHITE))
            },
            LocalTransform::at(start),
        );
        anim.tweens.add(
            flyer,
            Tween::position(node.center, FLIGHT_TIME, Easing::Power2Out)
                .with_delay(delay)
                .on_complete(Cue::CellLanded { cell, flyer }),
        );
        anim.tweens.add(
            flyer,
            Tween::scale_uniform(FLIGHT_SCALE, FLIGHT_TIME, Easing::Power1Out).with_delay(delay),
        );
    }

    /// A flight finished: drop the flyer, recolour the cell and pop its letter in.
    pub fn on_landed(&mut self, cell: CellId, flyer: EntityId, ctx: &mut EngineContext, anim: &mut Animations) {
        anim.tweens.kill_tweens_of(flyer);
        ctx.despawn_tree(flyer);
        self.paint_solved(cell, ctx);
        if let Some(letter) = self.letter(cell) {
            if let Some(local) = ctx.graph.local_mut(letter) {
                local.scale = Vec2::ZERO;
            }
            anim.tweens.add(letter, Tween::scale_uniform(1.0, POP_TIME, Easing::BACK_OUT));
        }
    }

    fn paint_solved(&self, cell: CellId, ctx: &mut EngineContext) {
        let Some(node) = self.cells.get(cell.0) else { return };
        if let Some(sprite) = ctx.scene.get_mut(node.tile).and_then(|e| e.sprite.as_mut()) {
            sprite.tint = ORANGE;
        }
        if let Some(text) = ctx.scene.get_mut(node.letter).and_then(|e| e.text.as_mut()) {
            text.color = Color::WHITE;
        }
        ctx.graph.set_visible(node.letter, true);
    }
}
