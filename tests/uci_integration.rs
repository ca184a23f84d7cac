use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use uci_chess_engine::board::Board;

struct Engine {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
}

impl Engine {
    fn spawn() -> Self {
        let exe = env!("CARGO_BIN_EXE_uci_chess_engine");
        let mut child = Command::new(exe)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("failed to spawn engine binary");
        let stdin = child.stdin.take().unwrap();
        let reader = BufReader::new(child.stdout.take().unwrap());
        Engine {
            child,
            stdin,
            reader,
        }
    }

    fn send(&mut self, commands: &str) {
        self.stdin.write_all(commands.as_bytes()).unwrap();
        self.stdin.flush().unwrap();
    }

    fn read_until(&mut self, prefix: &str) -> (String, Option<String>) {
        read_until(&mut self.reader, prefix)
    }

    fn quit(mut self) {
        let _ = self.stdin.write_all(b"quit\n");
        let _ = self.child.wait();
    }
}

/// Read lines until one starts with `prefix`; returns everything read.
fn read_until<R: BufRead>(reader: &mut R, prefix: &str) -> (String, Option<String>) {
    let mut output = String::new();
    loop {
        let mut line = String::new();
        let bytes = reader.read_line(&mut line).expect("read failed");
        if bytes == 0 {
            return (output, None);
        }
        output.push_str(&line);
        if line.starts_with(prefix) {
            return (output, Some(line.trim_end().to_string()));
        }
    }
}

fn bestmove_text(line: &str) -> &str {
    let parts: Vec<&str> = line.split_whitespace().collect();
    assert!(parts.len() >= 2, "bestmove missing move: {line}");
    parts[1]
}

fn assert_legal(position: &str, mv: &str) {
    let mut board: Board = position.parse().unwrap();
    assert!(
        board.parse_move(mv).is_ok(),
        "bestmove not legal in position: {mv}"
    );
}

#[test]
fn uci_greets_and_identifies() {
    let mut engine = Engine::spawn();
    engine.send("uci\n");
    let (output, uciok) = engine.read_until("uciok");
    engine.quit();

    let first = output.lines().next().unwrap();
    assert!(first.starts_with("uci_chess_engine by "), "greeting: {first}");
    assert!(output.contains("id name uci_chess_engine"));
    assert!(output.contains("id author "));
    assert!(output.contains("option name Hash"));
    assert!(output.contains("option name Move Overhead"));
    assert!(output.contains("option name Clear Hash type button"));
    assert!(uciok.is_some());
}

#[test]
fn uci_smoke_test_returns_legal_move() {
    let mut engine = Engine::spawn();
    engine.send("uci\nisready\nposition startpos moves e2e4\ngo movetime 50\n");
    let (output, bestmove) = engine.read_until("bestmove");
    engine.quit();

    assert!(output.contains("uciok"));
    assert!(output.contains("readyok"));
    assert!(output.contains("hashfull"));

    let bestmove = bestmove.expect("no bestmove found");
    let mv = bestmove_text(&bestmove);
    assert_ne!(mv, "0000", "engine returned null move");
    assert_legal(
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        mv,
    );
}

#[test]
fn uci_handles_setoption() {
    let mut engine = Engine::spawn();
    engine.send(
        "uci\nsetoption name Hash value 8\nsetoption name Move Overhead value 0\n\
         setoption name Clear Hash\nsetoption name Unknown value 3\nisready\n",
    );
    let (_, ready) = engine.read_until("readyok");
    engine.quit();
    assert!(ready.is_some());
}

#[test]
fn uci_go_depth_returns_legal_move() {
    let mut engine = Engine::spawn();
    engine.send("uci\nisready\nposition startpos\ngo depth 2\n");
    let (output, bestmove) = engine.read_until("bestmove");
    engine.quit();

    assert!(output.contains("info depth 2 "));
    let bestmove = bestmove.expect("no bestmove found");
    assert_legal(uci_chess_engine::board::START_FEN, bestmove_text(&bestmove));
}

/// Centipawn score of the last `info ... score cp N` line.
fn last_cp_score(output: &str) -> Option<i32> {
    output
        .lines()
        .filter(|line| line.starts_with("info depth"))
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            tokens.find(|&t| t == "cp")?;
            tokens.next()?.parse().ok()
        })
        .last()
}

#[test]
fn uci_kings_only_movetime() {
    let fen = "8/8/8/8/8/8/8/K6k w - - 0 1";
    let mut engine = Engine::spawn();
    engine.send(&format!("position fen {fen}\ngo movetime 50\n"));
    let (output, bestmove) = engine.read_until("bestmove");
    engine.quit();

    let bestmove = bestmove.expect("no bestmove found");
    assert_legal(fen, bestmove_text(&bestmove));
    let score = last_cp_score(&output).expect("no centipawn score reported");
    assert!(score.abs() <= 10, "bare kings scored {score}");
}

#[test]
fn uci_perft_command_outputs_nodes() {
    let mut engine = Engine::spawn();
    engine.send("uci\nisready\nposition startpos\nperft 1\n");
    let (_, perft) = engine.read_until("info string perft");
    engine.quit();

    let perft = perft.expect("perft output missing");
    assert!(perft.contains("perft depth 1 nodes 20"), "{perft}");
}

#[test]
fn uci_stop_interrupts_search() {
    let Engine {
        mut child,
        stdin,
        mut reader,
    } = Engine::spawn();
    let stdin = Arc::new(Mutex::new(stdin));
    stdin
        .lock()
        .unwrap()
        .write_all(b"uci\nisready\nposition startpos\ngo infinite\n")
        .unwrap();

    let stdin_clone = Arc::clone(&stdin);
    let stop_thread = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        let _ = stdin_clone.lock().unwrap().write_all(b"stop\n");
    });

    let (_, bestmove) = read_until(&mut reader, "bestmove");
    let _ = stop_thread.join();
    stdin.lock().unwrap().write_all(b"quit\n").unwrap();
    let _ = child.wait();

    let bestmove = bestmove.expect("no bestmove found");
    assert_ne!(bestmove_text(&bestmove), "0000", "engine returned null move");
}

#[test]
fn uci_checkmated_position_reports_null_move() {
    let mut engine = Engine::spawn();
    engine.send("position fen 7k/6Q1/6K1/8/8/8/8/8 b - - 0 1\ngo movetime 100\n");
    let (_, bestmove) = engine.read_until("bestmove");
    engine.quit();
    assert_eq!(bestmove.as_deref(), Some("bestmove 0000"));
}

#[test]
fn uci_survives_garbage() {
    let mut engine = Engine::spawn();
    engine.send(
        "hello\nposition fen bad\nposition startpos moves e2e5\ngo depth x\n\
         setoption name Hash value big\nisready\n",
    );
    let (_, ready) = engine.read_until("readyok");
    assert!(ready.is_some());
    engine.send("go depth 1\n");
    let (_, bestmove) = engine.read_until("bestmove");
    engine.quit();
    assert_legal(
        uci_chess_engine::board::START_FEN,
        bestmove_text(&bestmove.expect("no bestmove found")),
    );
}

#[test]
fn uci_exits_on_end_of_input() {
    let exe = env!("CARGO_BIN_EXE_uci_chess_engine");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn engine binary");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"isready\n")
        .unwrap();
    let output = child.wait_with_output().expect("failed to read output");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("readyok"));
}
