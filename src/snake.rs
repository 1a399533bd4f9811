use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::cell::{CellType, CellView, Position};
use crate::error::{Error, Result};
use crate::field::Field;
use Direction::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Left, Right, Down];

    pub fn opposite(&self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Up => "top",
            Down => "bottom",
            Left => "left",
            Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Direction::ALL
            .iter()
            .copied()
            .find(|dir| dir.name() == s)
            .ok_or_else(|| Error::InvalidDirection(s.to_string()))
    }
}

/// Outcome of a single step. Running into something is a normal result,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    GameOver { obstacle: CellType },
    AteApple { new_head: Position },
    Advanced { new_head: Position, old_tail: Position },
}

impl MoveResult {
    pub fn is_game_over(&self) -> bool {
        matches!(self, MoveResult::GameOver { .. })
    }
}

/// The snake's body runs tail-first, head-last. The snake never owns the
/// field it crawls on; every call that touches cells borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    turn_locked: bool,
}

impl Snake {
    /// Lays the body out as a straight line ending at `head`, trailing
    /// `size - 1` cells behind it. Cells that would leave the field interior
    /// are cut from the tail end.
    pub fn new<V: CellView>(field: &Field<V>, head: Position, size: usize, direction: Direction) -> Result<Self> {
        if !field.is_interior(head) {
            return Err(Error::OutOfBounds {
                x: head.x,
                y: head.y,
                cols: field.cols(),
                rows: field.rows(),
            });
        }

        // No straight line inside the walls is longer than the field's longest side
        let size = size.clamp(1, field.rows().max(field.cols()));
        let (dx, dy) = direction.delta();
        let body = (0..size as i32)
            .rev()
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .skip_while(|pos| !field.is_interior(*pos))
            .collect();

        Ok(Snake { body, direction, turn_locked: false })
    }

    /// Marks every body cell as snake, tail first.
    pub fn spawn<V: CellView>(&self, field: &mut Field<V>) -> Result<()> {
        for pos in &self.body {
            field.set_kind(*pos, CellType::Snake)?;
        }
        Ok(())
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn tail(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_turn_locked(&self) -> bool {
        self.turn_locked
    }

    /// Requests a turn. Only one turn is accepted between two moves, and
    /// reversing straight into the neck is refused. Returns whether the
    /// direction changed.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if self.turn_locked || new_direction == self.direction {
            return false;
        }
        if self.direction.is_opposite(new_direction) {
            return false;
        }

        self.direction = new_direction;
        self.turn_locked = true;
        true
    }

    /// Same as [`Snake::set_direction`], for a direction given by name.
    /// While a turn is pending, or when `name` is the current direction, the
    /// request is dropped before the name is checked.
    pub fn turn(&mut self, name: &str) -> Result<bool> {
        if self.turn_locked || name == self.direction.name() {
            return Ok(false);
        }
        let direction = name.parse()?;
        Ok(self.set_direction(direction))
    }

    pub fn turn_up(&mut self) -> bool {
        self.set_direction(Up)
    }

    pub fn turn_down(&mut self) -> bool {
        self.set_direction(Down)
    }

    pub fn turn_left(&mut self) -> bool {
        self.set_direction(Left)
    }

    pub fn turn_right(&mut self) -> bool {
        self.set_direction(Right)
    }

    /// Moves one cell in the current direction.
    pub fn step<V: CellView>(&mut self, field: &mut Field<V>) -> Result<MoveResult> {
        let (dx, dy) = self.direction.delta();
        let new_head = self.head().moved_by(dx, dy);

        let result = match field.kind_at(new_head)? {
            obstacle @ (CellType::Wall | CellType::Snake) => return Ok(MoveResult::GameOver { obstacle }),
            CellType::Apple => MoveResult::AteApple { new_head },
            CellType::Weed => {
                let old_tail = self.tail();
                self.body.pop_front();
                field.set_kind(old_tail, CellType::Weed)?;
                MoveResult::Advanced { new_head, old_tail }
            }
        };

        self.body.push_back(new_head);
        field.set_kind(new_head, CellType::Snake)?;
        self.turn_locked = false;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(rows: usize, cols: usize) -> Field<()> {
        Field::new(rows, cols, |_, _| ()).unwrap().with_seed(1)
    }

    fn spawned(field: &mut Field<()>, head: Position, size: usize, direction: Direction) -> Snake {
        let snake = Snake::new(field, head, size, direction).unwrap();
        snake.spawn(field).unwrap();
        snake
    }

    #[test]
    fn test_opposite_directions() {
        assert!(Up.is_opposite(Down));
        assert!(Down.is_opposite(Up));
        assert!(Left.is_opposite(Right));
        assert!(Right.is_opposite(Left));

        assert!(!Up.is_opposite(Left));
        assert!(!Up.is_opposite(Up));
    }

    #[test]
    fn test_direction_names() {
        assert_eq!("top".parse::<Direction>(), Ok(Up));
        assert_eq!("bottom".parse::<Direction>(), Ok(Down));
        assert_eq!("left".parse::<Direction>(), Ok(Left));
        assert_eq!("right".parse::<Direction>(), Ok(Right));
        assert_eq!("up".parse::<Direction>(), Err(Error::InvalidDirection("up".into())));
    }

    #[test]
    fn test_body_trails_behind_head() {
        let field = field(10, 10);
        let snake = Snake::new(&field, Position::new(5, 5), 3, Right).unwrap();

        let body: Vec<_> = snake.body().iter().copied().collect();
        assert_eq!(body, vec![Position::new(3, 5), Position::new(4, 5), Position::new(5, 5)]);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.tail(), Position::new(3, 5));

        let snake = Snake::new(&field, Position::new(4, 2), 2, Up).unwrap();
        assert_eq!(snake.tail(), Position::new(4, 3));
    }

    #[test]
    fn test_body_is_clipped_at_walls() {
        let field = field(5, 5);
        let snake = Snake::new(&field, Position::new(1, 1), 3, Right).unwrap();
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Position::new(1, 1));

        let snake = Snake::new(&field, Position::new(2, 3), 5, Up).unwrap();
        assert_eq!(snake.len(), 1);

        let snake = Snake::new(&field, Position::new(1, 2), 0, Up).unwrap();
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn test_head_must_be_inside_walls() {
        let field = field(5, 5);
        assert!(matches!(
            Snake::new(&field, Position::new(0, 2), 1, Right),
            Err(Error::OutOfBounds { x: 0, y: 2, .. })
        ));
        assert!(Snake::new(&field, Position::new(9, 9), 1, Right).is_err());
    }

    #[test]
    fn test_spawn_marks_body() {
        let mut field = field(8, 8);
        let snake = spawned(&mut field, Position::new(4, 3), 3, Down);

        for pos in snake.body() {
            assert_eq!(field.kind_at(*pos), Ok(CellType::Snake));
        }
        assert_eq!(field.count(CellType::Snake), 3);
    }

    #[test]
    fn test_reverse_turn_is_ignored() {
        let mut field = field(8, 8);
        let mut snake = spawned(&mut field, Position::new(4, 3), 3, Right);
        let before = snake.clone();

        assert!(!snake.turn_left());
        assert_eq!(snake, before);
        assert!(!snake.is_turn_locked());
    }

    #[test]
    fn test_same_direction_is_ignored() {
        let mut field = field(8, 8);
        let mut snake = spawned(&mut field, Position::new(4, 3), 3, Right);

        assert!(!snake.turn_right());
        assert!(!snake.is_turn_locked());
    }

    #[test]
    fn test_turn_lock_until_next_move() {
        let mut field = field(8, 8);
        let mut snake = spawned(&mut field, Position::new(4, 3), 3, Right);

        assert!(snake.turn_up());
        assert!(!snake.turn_left());
        assert_eq!(snake.direction(), Up);
        assert!(snake.is_turn_locked());

        snake.step(&mut field).unwrap();
        assert!(!snake.is_turn_locked());
        assert!(snake.turn_left());
        assert_eq!(snake.direction(), Left);
    }

    #[test]
    fn test_turn_by_name() {
        let mut field = field(8, 8);
        let mut snake = spawned(&mut field, Position::new(4, 3), 3, Right);

        assert_eq!(snake.turn("sideways"), Err(Error::InvalidDirection("sideways".into())));
        assert_eq!(snake.turn("right"), Ok(false));
        assert_eq!(snake.turn("bottom"), Ok(true));
        assert_eq!(snake.direction(), Down);
    }

    #[test]
    fn test_turn_by_name_while_locked_is_dropped() {
        let mut field = field(8, 8);
        let mut snake = spawned(&mut field, Position::new(4, 3), 3, Right);

        assert!(snake.turn_up());
        assert_eq!(snake.turn("sideways"), Ok(false));
        assert_eq!(snake.direction(), Up);

        snake.step(&mut field).unwrap();
        assert_eq!(snake.turn("sideways"), Err(Error::InvalidDirection("sideways".into())));
    }

    #[test]
    fn test_huge_length_is_clipped_at_walls() {
        let field = field(10, 10);
        let snake = Snake::new(&field, Position::new(5, 5), 1usize << 32, Right).unwrap();
        assert_eq!(snake.len(), 5);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.tail(), Position::new(1, 5));

        let snake = Snake::new(&field, Position::new(3, 7), usize::MAX, Down).unwrap();
        assert_eq!(snake.len(), 7);
    }

    #[test]
    fn test_advance_keeps_length() {
        let mut field = field(8, 8);
        let mut snake = spawned(&mut field, Position::new(4, 3), 3, Right);

        let result = snake.step(&mut field).unwrap();

        assert_eq!(
            result,
            MoveResult::Advanced { new_head: Position::new(5, 3), old_tail: Position::new(2, 3) }
        );
        assert_eq!(snake.len(), 3);
        assert_eq!(field.kind_at(Position::new(2, 3)), Ok(CellType::Weed));
        assert_eq!(field.kind_at(Position::new(5, 3)), Ok(CellType::Snake));
        assert_eq!(field.count(CellType::Snake), 3);
    }

    #[test]
    fn test_apple_grows_by_one() {
        let mut field = field(8, 8);
        let mut snake = spawned(&mut field, Position::new(4, 3), 3, Right);
        field.set_kind(Position::new(5, 3), CellType::Apple).unwrap();

        let result = snake.step(&mut field).unwrap();

        assert_eq!(result, MoveResult::AteApple { new_head: Position::new(5, 3) });
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), Position::new(2, 3));
        assert_eq!(field.count(CellType::Snake), 4);
        assert_eq!(field.count(CellType::Apple), 0);
    }

    #[test]
    fn test_wall_ends_game_without_moving() {
        let mut field = field(5, 5);
        let mut snake = spawned(&mut field, Position::new(3, 2), 2, Right);
        let before = snake.clone();

        let result = snake.step(&mut field).unwrap();

        assert_eq!(result, MoveResult::GameOver { obstacle: CellType::Wall });
        assert_eq!(snake, before);
        assert_eq!(field.count(CellType::Snake), 2);
    }

    #[test]
    fn test_biting_itself_ends_game() {
        let mut field = field(10, 10);
        let mut snake = spawned(&mut field, Position::new(5, 5), 5, Right);

        snake.turn_down();
        snake.step(&mut field).unwrap();
        snake.turn_left();
        snake.step(&mut field).unwrap();
        snake.turn_up();
        let before = snake.clone();
        let result = snake.step(&mut field).unwrap();

        assert_eq!(result, MoveResult::GameOver { obstacle: CellType::Snake });
        assert_eq!(snake, before);
    }

    #[test]
    fn test_chasing_the_tail_is_a_collision() {
        let mut field = field(10, 10);
        let mut snake = spawned(&mut field, Position::new(4, 4), 4, Right);

        snake.turn_down();
        snake.step(&mut field).unwrap();
        snake.turn_left();
        snake.step(&mut field).unwrap();
        snake.turn_up();
        // The tail sits at (3, 4), right where the head is heading.
        assert_eq!(snake.tail(), Position::new(3, 4));
        assert!(snake.step(&mut field).unwrap().is_game_over());
    }
}
