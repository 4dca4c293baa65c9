use std::f64::consts::PI;
use std::time::Duration;

use defaults::Defaults;
use druid::kurbo::{Arc, Line as Segment, RoundedRect};
use druid::piet::{LineCap, LineJoin, StrokeDash, StrokeStyle};
use druid::widget::{Button, Flex, Label};
use druid::{
    Affine, BoxConstraints, Color, Data, Env, Event, EventCtx, LayoutCtx, LifeCycle, LifeCycleCtx,
    MouseButton, PaintCtx, Point, RenderContext, Size, UpdateCtx, Widget, WidgetExt, WidgetPod,
};
use keyframe::functions::{EaseInCubic, EaseInOutQuart};
use tracing::debug;

use crate::anim::Tween;
use crate::effects::{self, Effect, EffectQueue};
use crate::engine::{Line, Player, Status, TicTacToe};

const BACKGROUND: Color = Color::BLACK;
const BORDER_COLOR: Color = Color::rgb8(0x87, 0xCE, 0xEB);
const X_COLOR: Color = Color::rgb8(0xFF, 0x6B, 0x6B);
const O_COLOR: Color = Color::rgb8(0x4E, 0xCD, 0xC4);
const HIGHLIGHT_COLOR: Color = Color::rgb8(0xFF, 0xD9, 0x3D);

#[derive(Clone, Copy, Data, Debug, Defaults)]
pub struct Pacing {
    #[def = "1500"]
    pub reset_ms: u64
}

#[derive(Clone, Data)]
pub struct AppState {
    game: TicTacToe,
    pacing: Pacing,
    banner: Option<Status>
}
impl AppState {
    pub fn new(pacing: Pacing) -> Self {
        Self {
            game: TicTacToe::new(),
            pacing,
            banner: None
        }
    }
    pub fn headline(&self) -> String {
        match self.banner {
            Some(Status::Won { winner, .. }) => format!("{winner} Wins!"),
            Some(Status::Draw) => "It's a Draw!".to_string(),
            _ => format!("Current Player: {}", self.game.turn())
        }
    }
    pub fn reset(&mut self) {
        self.game.reset();
        self.banner = None;
    }
}
impl Default for AppState {
    fn default() -> Self {
        Self::new(Pacing::default())
    }
}

pub fn build_game() -> impl Widget<AppState> {
    let title = Label::new("TIC TAC TOE")
        .with_text_size(28.0)
        .with_text_color(BORDER_COLOR);
    let headline = Label::dynamic(|data: &AppState, _| data.headline())
        .with_text_size(18.0)
        .with_text_color(HIGHLIGHT_COLOR);
    let new_game = Button::new("New Game")
        .on_click(|_, data: &mut AppState, _| {
            debug!("new game requested");
            data.reset();
        });

    Flex::column()
        .with_child(title)
        .with_spacer(10.0)
        .with_child(headline)
        .with_spacer(20.0)
        .with_flex_child(Grid::default().padding(5.0).border(BORDER_COLOR, 3.0), 1.0)
        .with_spacer(20.0)
        .with_child(new_game)
        .padding(20.0)
        .background(BACKGROUND)
}

fn stroke_style() -> StrokeStyle {
    StrokeStyle {
        line_join: LineJoin::Round,
        line_cap: LineCap::Round,
        dash_pattern: StrokeDash::default(),
        dash_offset: 0.0
    }
}

pub struct GridCell {
    idx: usize,
    mark: Option<Player>,
    reveal: Tween<EaseInOutQuart, 500>,
    hover: Tween<EaseInOutQuart, 100>,
    lit: bool,
    offset: f64
}
impl GridCell {
    fn new(idx: usize) -> Self {
        Self {
            idx,
            mark: None,
            reveal: Tween::idle(),
            hover: Tween::idle(),
            lit: false,
            offset: 0.0
        }
    }
    fn apply(&mut self, effect: &Effect) {
        match *effect {
            Effect::Highlight { lit, .. } => self.lit = lit,
            Effect::Shake { offset, .. } => self.offset = offset,
            _ => ()
        }
    }
    fn settle(&mut self) {
        self.lit = false;
        self.offset = 0.0;
    }
}
impl Widget<AppState> for GridCell {
    fn event(&mut self, ctx: &mut EventCtx, event: &Event, _: &mut AppState, _: &Env) {
        if let &Event::AnimFrame(t) = event {
            ctx.request_paint();
            if self.reveal.anim_frame(t) {
                ctx.request_anim_frame();
            }
            if self.hover.anim_frame(t) {
                ctx.request_anim_frame();
            }
        }
    }

    fn lifecycle(&mut self, ctx: &mut LifeCycleCtx, event: &LifeCycle, data: &AppState, _: &Env) {
        if let &LifeCycle::HotChanged(hot) = event {
            if hot && data.game.get(self.idx).is_none() && !data.game.is_over() {
                self.hover.play_forward();
            } else {
                self.hover.play_backward();
            }
            ctx.request_anim_frame();
        }
    }

    fn update(&mut self, ctx: &mut UpdateCtx, old_data: &AppState, data: &AppState, _: &Env) {
        let now = data.game.get(self.idx);
        if now == old_data.game.get(self.idx) {
            return;
        }
        match now {
            Some(mark) => {
                self.mark = Some(mark);
                self.reveal.play_forward();
                self.hover.play_backward();
            },
            None => self.reveal.play_backward()
        }
        ctx.request_anim_frame();
    }

    fn layout(&mut self, _: &mut LayoutCtx, bc: &BoxConstraints, _: &AppState, _: &Env) -> Size {
        bc.max()
    }

    fn paint(&mut self, ctx: &mut PaintCtx, _: &AppState, _: &Env) {
        const MARK_WIDTH: f64 = 7.0;
        const MARK_SCALE: f64 = 0.5;
        const HOVER_SCALE: f64 = 0.9;
        const HOVER_COLOR: Color = Color::grey8(0x11);
        const HOVER_RADII: f64 = 0.1;

        let size = ctx.size().width;
        let line_style = stroke_style();
        let offset = self.offset;
        let hover = *self.hover;
        let reveal = *self.reveal;
        let lit = self.lit;
        let mark = self.mark;

        ctx.with_save(|ctx| {
            ctx.transform(Affine::translate((offset, 0.0)));

            let pad = size * (1.0 - HOVER_SCALE) / 2.0;
            let tile = RoundedRect::new(pad, pad, size - pad, size - pad, size * HOVER_RADII);
            if lit {
                ctx.fill(tile, &HIGHLIGHT_COLOR.with_alpha(0.6));
            } else if hover > 0.0 {
                let len = (size - 2.0 * pad) * hover;
                let min = (size - len) / 2.0;
                let shape = RoundedRect::new(min, min, min + len, min + len, len * HOVER_RADII);
                ctx.fill(shape, &HOVER_COLOR.with_alpha(hover));
            }

            if reveal <= 0.0 {
                return;
            }
            match mark {
                Some(Player::X) => {
                    let len = size * MARK_SCALE * reveal;
                    let off = (size - len) / 2.0;
                    let line1 = Segment::new((off, off), (off + len, off + len));
                    let line2 = Segment::new((off + len, off), (off, off + len));
                    ctx.stroke_styled(line1, &X_COLOR, MARK_WIDTH, &line_style);
                    ctx.stroke_styled(line2, &X_COLOR, MARK_WIDTH, &line_style);
                },
                Some(Player::O) => {
                    let off = size / 2.0;
                    let rad = MARK_SCALE * off;
                    let arc = Arc {
                        center: Point::new(off, off),
                        radii: druid::Vec2::new(rad, rad),
                        start_angle: -PI / 2.0,
                        sweep_angle: PI * 2.0 * reveal,
                        x_rotation: 0.0,
                    };
                    ctx.stroke_styled(arc, &O_COLOR, MARK_WIDTH, &line_style);
                },
                None => ()
            }
        });
    }
}

pub struct Grid {
    intro: Tween<EaseInCubic, 1000>,
    strike: Tween<EaseInCubic, 500>,
    strike_line: Option<Line>,
    effects: EffectQueue,
    cells: [WidgetPod<AppState, GridCell>; 9]
}
impl Default for Grid {
    fn default() -> Self {
        Self {
            intro: Tween::idle(),
            strike: Tween::idle(),
            strike_line: None,
            effects: EffectQueue::default(),
            cells: std::array::from_fn(|i| WidgetPod::new(GridCell::new(i)))
        }
    }
}
impl Grid {
    fn hit(pos: Point, size: Size) -> Option<usize> {
        let cell = size.width / 3.0;
        if cell <= 0.0 || pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let (col, row) = ((pos.x / cell) as usize, (pos.y / cell) as usize);
        (col < 3 && row < 3).then_some(row * 3 + col)
    }
    /// Returns true when the move queued effects.
    fn play(&mut self, data: &mut AppState, idx: usize) -> bool {
        match data.game.attempt_move(idx) {
            Ok(placed) if placed.status.is_terminal() => {
                let pause = Duration::from_millis(data.pacing.reset_ms);
                self.effects.extend(effects::game_over(placed.status, pause));
                true
            },
            Ok(_) => false,
            Err(err) => {
                debug!(%err, "shaking rejected cell");
                self.effects.extend(effects::shake(idx));
                true
            }
        }
    }
    fn sync_reset(&mut self, old_data: &AppState, data: &AppState) -> bool {
        if data.game.moves_played() != 0 || old_data.game.moves_played() == 0 {
            return false;
        }
        self.effects.clear();
        for e in self.cells.iter_mut() {
            e.widget_mut().settle();
        }
        true
    }
    fn run_effects(&mut self, data: &mut AppState, dt: Duration) {
        for effect in self.effects.advance(dt) {
            match &effect {
                Effect::Highlight { cells, .. } => {
                    for &i in cells {
                        self.cells[i].widget_mut().apply(&effect);
                    }
                },
                Effect::Shake { cell, .. } => {
                    if let Some(e) = self.cells.get_mut(*cell) {
                        e.widget_mut().apply(&effect);
                    }
                },
                Effect::Announce(status) => data.banner = Some(*status),
                Effect::Reset => data.reset()
            }
        }
    }
}
impl Widget<AppState> for Grid {
    fn event(&mut self, ctx: &mut EventCtx, event: &Event, data: &mut AppState, env: &Env) {
        match event {
            &Event::AnimFrame(t) => {
                ctx.request_paint();
                if self.intro.anim_frame(t) {
                    ctx.request_anim_frame();
                }
                if self.strike.anim_frame(t) {
                    ctx.request_anim_frame();
                }
                if !self.effects.is_idle() {
                    self.run_effects(data, Duration::from_nanos(t));
                    if !self.effects.is_idle() {
                        ctx.request_anim_frame();
                    }
                }
            },
            Event::MouseDown(mouse) if mouse.button == MouseButton::Left => {
                if let Some(idx) = Self::hit(mouse.pos, ctx.size()) {
                    if self.play(data, idx) {
                        ctx.request_anim_frame();
                    }
                }
            },
            _ => ()
        }

        for e in self.cells.iter_mut() {
            e.event(ctx, event, data, env);
        }
    }

    fn lifecycle(&mut self, ctx: &mut LifeCycleCtx, event: &LifeCycle, data: &AppState, env: &Env) {
        if let LifeCycle::WidgetAdded = event {
            self.intro.play_forward();
            ctx.request_anim_frame();
        }

        for e in self.cells.iter_mut() {
            e.lifecycle(ctx, event, data, env);
        }
    }

    fn update(&mut self, ctx: &mut UpdateCtx, old_data: &AppState, data: &AppState, env: &Env) {
        match (old_data.game.status(), data.game.status()) {
            (old, new @ Status::Won { line, .. }) if old != new => {
                self.strike_line = Some(line);
                self.strike.play_forward();
                ctx.request_anim_frame();
            },
            (Status::Won { .. }, new) if !matches!(new, Status::Won { .. }) => {
                self.strike.play_backward();
                ctx.request_anim_frame();
            },
            _ => ()
        }

        if self.sync_reset(old_data, data) {
            ctx.request_paint();
        }

        for e in self.cells.iter_mut() {
            e.update(ctx, data, env);
        }
    }

    fn layout(&mut self, ctx: &mut LayoutCtx, bc: &BoxConstraints, data: &AppState, env: &Env) -> Size {
        let max = bc.max();
        let side = match max.width.min(max.height) {
            x if x.is_finite() => x,
            _ => 300.0
        };
        let cell = BoxConstraints::tight(Size::new(side / 3.0, side / 3.0));
        for (i, e) in self.cells.iter_mut().enumerate() {
            let size = e.layout(ctx, &cell, data, env);
            e.set_origin(ctx, Point::new((i % 3) as f64 * size.width, (i / 3) as f64 * size.height));
        }
        bc.constrain(Size::new(side, side))
    }

    fn paint(&mut self, ctx: &mut PaintCtx, data: &AppState, env: &Env) {
        const GRID_LINE_SCALE: f64 = 0.95;
        const GRID_LINE_WIDTH: f64 = 5.0;
        const STRIKE_SCALE: f64 = 2.0/3.0;
        const STRIKE_WIDTH: f64 = 15.0;
        const STRIKE_COLOR: Color = Color::grey8(220);

        let line_style = stroke_style();
        let size = ctx.size().width;
        let grid_padd = size / 3.0;
        let grid_line_len = size * GRID_LINE_SCALE * *self.intro;
        let grid_line_off = (size - grid_line_len) / 2.0;

        for e in self.cells.iter_mut() {
            e.paint(ctx, data, env);
        }

        for k in [1.0, 2.0] {
            let at = grid_padd * k;
            let horizontal = Segment::new((grid_line_off, at), (grid_line_off + grid_line_len, at));
            let vertical = Segment::new((at, grid_line_off), (at, grid_line_off + grid_line_len));
            ctx.stroke_styled(horizontal, &BORDER_COLOR, GRID_LINE_WIDTH, &line_style);
            ctx.stroke_styled(vertical, &BORDER_COLOR, GRID_LINE_WIDTH, &line_style);
        }

        let progress = *self.strike;
        let Some(line) = self.strike_line else { return };
        if progress <= 0.0 {
            return;
        }
        let len = size * STRIKE_SCALE * progress;
        let off = (size - len) / 2.0;
        let shape = match line.orientation() {
            orien @ 0..=2 => {
                let y = grid_padd * orien as f64 + grid_padd / 2.0;
                Segment::new((off, y), (off + len, y))
            },
            orien @ 3..=5 => {
                let x = grid_padd * (orien - 3) as f64 + grid_padd / 2.0;
                Segment::new((x, off), (x, off + len))
            },
            6 => Segment::new((off, off), (off + len, off + len)),
            _ => Segment::new((off + len, off), (off, off + len))
        };
        ctx.stroke_styled(shape, &STRIKE_COLOR, STRIKE_WIDTH, &line_style);
    }
}
