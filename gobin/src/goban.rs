use std::fmt;

use arrayvec::ArrayVec;

use crate::error::IllegalMove;
use crate::ko::Ko;
use crate::stone::Stone;
use crate::turn::{Move, Turn};
use crate::{BOARD_SIZE, CELLS, Point};

const WORDS: usize = CELLS.div_ceil(64);

/// Column letters of the text dump; `I` is skipped by convention.
const COLUMNS: &[u8] = b"ABCDEFGHJKLMNOPQRST";

/// Exact liberty set of a group, one bit per cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LibSet([u64; WORDS]);

impl LibSet {
    fn insert(&mut self, i: usize) {
        self.0[i / 64] |= 1 << (i % 64);
    }

    fn remove(&mut self, i: usize) {
        self.0[i / 64] &= !(1 << (i % 64));
    }

    fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    fn is_empty(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    fn union_with(&mut self, other: &LibSet) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a |= b;
        }
    }
}

/// Outcome of a legal stone placement, computed without touching the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Opponent stones removed by the move.
    pub captures: usize,
    /// Stones in the mover's group once merged.
    pub group_size: usize,
    /// Liberties of the mover's group after captures.
    pub liberties: usize,
    /// Point that becomes a ko for the opponent, if any.
    pub ko: Option<Point>,
}

/// A 19×19 board with incremental group tracking.
///
/// Groups live in an index-keyed union-find over the flat cell array.
/// Each root holds the group's stone count and exact liberty set, and
/// `next` threads every group's stones into a circular list so a capture
/// touches only the captured stones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goban {
    cells: [Option<Stone>; CELLS],
    parent: [u16; CELLS],
    next: [u16; CELLS],
    size: [u16; CELLS],
    libs: Vec<LibSet>,
    placed_at: [Option<usize>; CELLS],
    ko: Option<Ko>,
    ply: usize,
    to_move: Stone,
}

impl Default for Goban {
    fn default() -> Self {
        Self::new()
    }
}

impl Goban {
    pub fn new() -> Self {
        Goban {
            cells: [None; CELLS],
            parent: std::array::from_fn(|i| i as u16),
            next: std::array::from_fn(|i| i as u16),
            size: [1; CELLS],
            libs: vec![LibSet::default(); CELLS],
            placed_at: [None; CELLS],
            ko: None,
            ply: 0,
            to_move: Stone::Black,
        }
    }

    // -- Accessors --

    pub fn ko(&self) -> Option<&Ko> {
        self.ko.as_ref()
    }

    /// Plies played so far; setup stones do not count.
    pub fn ply(&self) -> usize {
        self.ply
    }

    pub fn to_move(&self) -> Stone {
        self.to_move
    }

    pub fn set_to_move(&mut self, stone: Stone) {
        self.to_move = stone;
    }

    pub fn on_board(&self, (x, y): Point) -> bool {
        (x as usize) < BOARD_SIZE && (y as usize) < BOARD_SIZE
    }

    pub fn stone_at(&self, point: Point) -> Option<Stone> {
        if self.on_board(point) {
            self.cells[idx(point)]
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Liberty count of the group at `point`, 0 for an empty point.
    pub fn liberties(&self, point: Point) -> usize {
        match self.stone_at(point) {
            Some(_) => self.libs[self.find(idx(point))].len(),
            None => 0,
        }
    }

    /// All stones of the group at `point`.
    pub fn chain(&self, point: Point) -> Vec<Point> {
        match self.stone_at(point) {
            Some(_) => self
                .members(self.find(idx(point)))
                .into_iter()
                .map(to_point)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Plies since the stone at `point` was played: 1 for the last move.
    /// `None` for empty points and setup stones.
    pub fn turns_since(&self, point: Point) -> Option<usize> {
        if !self.on_board(point) {
            return None;
        }
        self.placed_at[idx(point)].map(|at| self.ply - at)
    }

    // -- Game actions --

    /// Place a handicap stone. No ko, turn or capture rules apply.
    pub fn place_setup(&mut self, stone: Stone, point: Point) -> Result<(), IllegalMove> {
        if !self.on_board(point) {
            return Err(IllegalMove::NotOnBoard);
        }
        if self.cells[idx(point)].is_some() {
            return Err(IllegalMove::Occupied);
        }
        self.put(idx(point), stone);
        Ok(())
    }

    /// Play a stone, removing captured groups. Returns the number of captured stones.
    ///
    /// An illegal move leaves the board untouched.
    pub fn play(&mut self, stone: Stone, point: Point) -> Result<usize, IllegalMove> {
        let placement = self.analyze(stone, point)?;

        let i = idx(point);
        self.put(i, stone);
        self.placed_at[i] = Some(self.ply);

        let mut captured = 0;
        for n in neighbors(i) {
            if self.cells[n] == Some(stone.opp()) {
                let root = self.find(n);
                if self.libs[root].is_empty() {
                    captured += self.capture(root);
                }
            }
        }
        debug_assert_eq!(captured, placement.captures);

        self.ko = placement.ko.map(|pos| Ko {
            pos,
            illegal: stone.opp(),
        });
        self.ply += 1;
        self.to_move = stone.opp();
        Ok(captured)
    }

    /// Pass: clears ko.
    pub fn pass(&mut self, stone: Stone) {
        self.ko = None;
        self.ply += 1;
        self.to_move = stone.opp();
    }

    pub fn apply(&mut self, turn: &Turn) -> Result<usize, IllegalMove> {
        match (turn.kind, turn.pos) {
            (Move::Play, Some(point)) => self.play(turn.stone, point),
            (Move::Setup, Some(point)) => self.place_setup(turn.stone, point).map(|_| 0),
            (Move::Pass, _) => {
                self.pass(turn.stone);
                Ok(0)
            }
            (Move::Play | Move::Setup, None) => Err(IllegalMove::NotOnBoard),
        }
    }

    pub fn is_legal(&self, stone: Stone, point: Point) -> bool {
        self.analyze(stone, point).is_ok()
    }

    /// Dry run of [`Goban::play`].
    pub fn analyze(&self, stone: Stone, point: Point) -> Result<Placement, IllegalMove> {
        if !self.on_board(point) {
            return Err(IllegalMove::NotOnBoard);
        }
        let i = idx(point);
        if self.cells[i].is_some() {
            return Err(IllegalMove::Occupied);
        }
        if self.ko.is_some_and(|ko| ko.forbids(stone, point)) {
            return Err(IllegalMove::KoViolation);
        }

        let mut own: ArrayVec<usize, 4> = ArrayVec::new();
        let mut dead: ArrayVec<usize, 4> = ArrayVec::new();
        let mut libs = LibSet::default();

        for n in neighbors(i) {
            match self.cells[n] {
                None => libs.insert(n),
                Some(s) => {
                    let root = self.find(n);
                    if s == stone {
                        if !own.contains(&root) {
                            own.push(root);
                        }
                    } else if self.libs[root].len() == 1 && !dead.contains(&root) {
                        // Its only liberty is `i`.
                        dead.push(root);
                    }
                }
            }
        }

        let mut group_size = 1;
        for &root in &own {
            libs.union_with(&self.libs[root]);
            group_size += self.size[root] as usize;
        }
        libs.remove(i);

        let mut captures = 0;
        let mut last_captured = None;
        for &root in &dead {
            for s in self.members(root) {
                captures += 1;
                last_captured = Some(s);
                let touches_group = neighbors(s).iter().any(|&n| {
                    n == i || (self.cells[n] == Some(stone) && own.contains(&self.find(n)))
                });
                if touches_group {
                    libs.insert(s);
                }
            }
        }

        if libs.is_empty() {
            return Err(IllegalMove::Suicide);
        }

        let liberties = libs.len();
        let ko = match last_captured {
            Some(s) if captures == 1 && group_size == 1 && liberties == 1 => Some(to_point(s)),
            _ => None,
        };

        Ok(Placement {
            captures,
            group_size,
            liberties,
            ko,
        })
    }

    // -- Group bookkeeping --

    fn find(&self, mut i: usize) -> usize {
        while self.parent[i] as usize != i {
            i = self.parent[i] as usize;
        }
        i
    }

    fn members(&self, root: usize) -> Vec<usize> {
        let mut stones = Vec::with_capacity(self.size[root] as usize);
        let mut cur = root;
        loop {
            stones.push(cur);
            cur = self.next[cur] as usize;
            if cur == root {
                return stones;
            }
        }
    }

    /// Set a stone, take its point from neighboring groups and merge with friends.
    fn put(&mut self, i: usize, stone: Stone) {
        self.cells[i] = Some(stone);
        self.parent[i] = i as u16;
        self.next[i] = i as u16;
        self.size[i] = 1;

        let mut libs = LibSet::default();
        for n in neighbors(i) {
            match self.cells[n] {
                None => libs.insert(n),
                Some(_) => {
                    let root = self.find(n);
                    self.libs[root].remove(i);
                }
            }
        }
        self.libs[i] = libs;

        for n in neighbors(i) {
            if self.cells[n] == Some(stone) {
                self.union(i, n);
            }
        }
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big as u16;
        self.size[big] += self.size[small];
        let small_libs = self.libs[small];
        self.libs[big].union_with(&small_libs);
        // Splice the two circular member lists.
        self.next.swap(big, small);
    }

    /// Remove the group rooted at `root` and hand its points back as liberties.
    fn capture(&mut self, root: usize) -> usize {
        let stones = self.members(root);
        for &s in &stones {
            self.cells[s] = None;
            self.placed_at[s] = None;
        }
        for &s in &stones {
            self.parent[s] = s as u16;
            self.next[s] = s as u16;
            self.size[s] = 1;
            self.libs[s] = LibSet::default();
        }
        for &s in &stones {
            for n in neighbors(s) {
                if self.cells[n].is_some() {
                    let r = self.find(n);
                    self.libs[r].insert(s);
                }
            }
        }
        stones.len()
    }
}

#[inline]
fn idx((x, y): Point) -> usize {
    y as usize * BOARD_SIZE + x as usize
}

#[inline]
fn to_point(i: usize) -> Point {
    ((i % BOARD_SIZE) as u8, (i / BOARD_SIZE) as u8)
}

/// The 4-connected neighbors of a cell that are on the board.
fn neighbors(i: usize) -> ArrayVec<usize, 4> {
    let (x, y) = (i % BOARD_SIZE, i / BOARD_SIZE);
    let mut result = ArrayVec::new();
    if x > 0 {
        result.push(i - 1);
    }
    if x + 1 < BOARD_SIZE {
        result.push(i + 1);
    }
    if y > 0 {
        result.push(i - BOARD_SIZE);
    }
    if y + 1 < BOARD_SIZE {
        result.push(i + BOARD_SIZE);
    }
    result
}

impl fmt::Display for Goban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: String = COLUMNS
            .iter()
            .map(|&c| format!(" {}", c as char))
            .collect();
        writeln!(f, "  {header}")?;
        for y in 0..BOARD_SIZE {
            let row = BOARD_SIZE - y;
            write!(f, "{row:>2}")?;
            for x in 0..BOARD_SIZE {
                let glyph = self.cells[y * BOARD_SIZE + x].map_or('.', Stone::glyph);
                write!(f, " {glyph}")?;
            }
            writeln!(f, " {row:<2}")?;
        }
        write!(f, "  {header}")
    }
}
