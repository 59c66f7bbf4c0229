use glam::{Mat4, Vec3, vec3};
use rand::{SeedableRng, rngs::SmallRng};
use wgpu::TextureView;
use winit::{dpi::PhysicalSize, window::WindowAttributes};

use crate::game::{
    Coin, GameContext, GameEvent, InitError, LevelChanger, Player, Session, Sprite, Time, Zapper,
    ZapperStyle,
};
use crate::input::{InputBindings, InputHandler};
use crate::renderer::{RenderContext, Renderer, SCR_HEIGHT, SCR_WIDTH, Shape, TextureId};

const BACKGROUND_RECYCLE_X: f32 = -2.0;
const BACKGROUND_SHIFT: f32 = 4.0;
const PLAYER_START: Vec3 = vec3(-0.7, -0.7, 0.0);
const PLAYER_CEILING: f32 = 0.9;

const TEXT_COLOR: Vec3 = Vec3::ONE;
const HUD_SCALE: f32 = 0.001;
const READY_SCALE: f32 = 0.0015;
const FINAL_SCALE: f32 = 0.002;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Playing,
    /// The run ended; only the end screen and the quit key remain live.
    Terminal,
}

#[derive(Debug)]
pub struct Game {
    clock: Time,
    renderer: Renderer,
    input: InputHandler,
    rng: SmallRng,
    session: Session,
    backgrounds: [Sprite; 2],
    level_changer: LevelChanger,
    player: Player,
    zappers: [Zapper; 3],
    coins: [Coin; 3],
    phase: Phase,
}

impl Game {
    pub fn window_attributes() -> WindowAttributes {
        WindowAttributes::default()
            .with_title("Jetpack")
            .with_inner_size(PhysicalSize::new(SCR_WIDTH, SCR_HEIGHT))
    }

    pub fn new(ctx: GameContext) -> Result<Self, InitError> {
        let renderer = Renderer::new(ctx.into())?;
        let mut rng = SmallRng::from_entropy();

        let zappers = [
            Zapper::new(vec3(1.6, 0.0, 0.0), &mut rng),
            Zapper::new(vec3(2.4, 0.0, 0.0), &mut rng),
            Zapper::new(vec3(3.2, 0.0, 0.0), &mut rng),
        ];
        let coins = [
            Coin::new(vec3(2.0, 0.0, 0.0), &mut rng),
            Coin::new(vec3(2.8, 0.0, 0.0), &mut rng),
            Coin::new(vec3(3.6, 0.0, 0.0), &mut rng),
        ];

        Ok(Self {
            clock: Time::new(),
            renderer,
            input: InputHandler::new(&InputBindings::default()),
            rng,
            session: Session::new(),
            backgrounds: [
                Sprite::new(vec3(0.0, 0.0, 0.0)),
                Sprite::new(vec3(2.0, 0.0, 0.0)),
            ],
            level_changer: LevelChanger::new(vec3(1.0, -0.4, 0.0)),
            player: Player::new(PLAYER_START, PLAYER_CEILING),
            zappers,
            coins,
            phase: Phase::Playing,
        })
    }

    pub fn update(&mut self, ctx: GameContext) {
        let dt = self.clock.tick();
        let input = self.input.next_state();

        if input.quit.is_pressed {
            ctx.exit();
            return;
        }

        if self.phase == Phase::Terminal {
            return;
        }

        if input.fly.is_held {
            self.player.fly();
        }

        let dx = -self.session.scroll_speed() * dt;

        for background in &mut self.backgrounds {
            background.advance(dx, 0.0, 0.0);
            if background.position.x <= BACKGROUND_RECYCLE_X {
                background.translate_by(BACKGROUND_SHIFT, 0.0, 0.0);
            }
        }

        // The trigger test runs against the player position from before this
        // frame's physics step.
        let player_x = self.player.sprite.position.x;
        self.level_changer.advance(dx, &mut self.session, player_x);

        self.player.advance();
        let player_pos = self.player.sprite.position;

        for zapper in &mut self.zappers {
            zapper.advance(dx, &mut self.session, player_pos, &mut self.rng);
        }
        for coin in &mut self.coins {
            coin.advance(dx, &mut self.session, player_pos, &mut self.rng);
        }

        if self.session.is_over() {
            if self.session.game_won {
                log::info!("game won with score {}", self.session.score);
            } else {
                log::info!("game over with score {}", self.session.score);
            }
            self.phase = Phase::Terminal;
            return;
        }

        if self.session.started {
            self.session.travelled -= dx;
        }
    }

    pub fn event(&mut self, event: &GameEvent, ctx: GameContext) {
        self.input.event(event);

        if matches!(event, GameEvent::CloseRequested) {
            ctx.exit();
        }
    }

    pub fn render(&mut self, target: &TextureView, ctx: GameContext) {
        let ctx = RenderContext::from(ctx);
        let Self {
            renderer,
            session,
            backgrounds,
            level_changer,
            player,
            zappers,
            coins,
            phase,
            ..
        } = self;

        renderer.render_frame(target, &ctx, |frame| match phase {
            Phase::Playing => {
                for background in backgrounds.iter() {
                    frame.draw_sprite(
                        Shape::Background,
                        TextureId::Background,
                        background.model,
                        background.smoothstep,
                    );
                }

                frame.draw_sprite(
                    Shape::Pillar,
                    TextureId::Pillar,
                    level_changer.sprite.model,
                    level_changer.sprite.smoothstep,
                );

                frame.draw_sprite(
                    Shape::Player,
                    TextureId::PlayerRun(player.texture_index()),
                    player.sprite.model,
                    player.sprite.smoothstep,
                );

                for zapper in zappers.iter() {
                    let texture = if zapper.style == ZapperStyle::Diagonal {
                        TextureId::DiagonalZapper
                    } else {
                        TextureId::Zapper
                    };
                    frame.draw_sprite(
                        Shape::Zapper(zapper.style.index()),
                        texture,
                        zapper.sprite.model,
                        zapper.sprite.smoothstep,
                    );
                }

                for coin in coins.iter() {
                    let shape = if coin.exists { Shape::Coin } else { Shape::Blank };
                    frame.draw_sprite(shape, TextureId::Coin, coin.sprite.model, coin.sprite.smoothstep);
                }

                frame.draw_text(
                    &format!("Level: {}", session.level),
                    -0.95,
                    -0.9,
                    HUD_SCALE,
                    TEXT_COLOR,
                );
                frame.draw_text(
                    &format!(
                        "Completed: {}/{}",
                        (session.travelled * 100.0) as i32,
                        (session.level_length * 100.0) as i32,
                    ),
                    -0.95,
                    0.8,
                    HUD_SCALE,
                    TEXT_COLOR,
                );
                frame.draw_text(
                    &format!("Score: {}", session.score),
                    -0.95,
                    0.9,
                    HUD_SCALE,
                    TEXT_COLOR,
                );

                if !session.started {
                    frame.draw_text("Get Ready for level 1", -0.95, 0.3, READY_SCALE, TEXT_COLOR);
                }
            }

            Phase::Terminal => {
                let texture = if session.game_won {
                    TextureId::GameWin
                } else {
                    TextureId::GameOver
                };
                frame.draw_sprite(Shape::Background, texture, Mat4::IDENTITY, 0.0);

                frame.draw_text(
                    &format!("Final Score: {}", session.score),
                    -0.95,
                    -0.9,
                    FINAL_SCALE,
                    TEXT_COLOR,
                );
            }
        });
    }

    pub fn end(&self) {
        log::info!("exiting with final score {}", self.session.score);
    }
}
