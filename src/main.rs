//! Checkers AI CLI
//!
//! 命令行界面，用于测试 AI
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，通过 stdin/stdout 通信

use checkers_engine::test_positions::START;
use checkers_engine::{
    evaluate_detailed, get_node_count, legal_moves_from_fen, parse_fen, reset_node_count,
    AIConfig, Color, EvalBreakdown, Engine, GameResult, Outcome, DEFAULT_STRATEGY,
};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::sync::atomic::AtomicBool;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "checkers-engine")]
#[command(about = "Checkers AI Engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 获取合法走法
    Moves {
        /// FEN 字符串
        #[arg(long)]
        fen: String,
    },

    /// 选择最佳走法
    Best {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// AI 策略 (alphabeta, random)
        #[arg(long, default_value = DEFAULT_STRATEGY)]
        strategy: String,

        /// 搜索深度
        #[arg(long, default_value = "1")]
        depth: u32,

        /// 时间限制（秒）
        #[arg(long)]
        time_limit: Option<f64>,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 评估局面分数
    Score {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 引擎自对弈
    Selfplay {
        /// 起始局面（默认开局）
        #[arg(long)]
        fen: Option<String>,

        /// 黑方策略
        #[arg(long, default_value = DEFAULT_STRATEGY)]
        black: String,

        /// 白方策略
        #[arg(long, default_value = DEFAULT_STRATEGY)]
        white: String,

        /// 搜索深度
        #[arg(long, default_value = "1")]
        depth: u32,

        /// 最大步数
        #[arg(long, default_value = "200")]
        max_plies: usize,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 启动 server 模式（stdin/stdout 通信）
    Server,
}

#[derive(Serialize)]
struct BestResponse {
    outcome: String,
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    mv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<i32>,
    forced: bool,
    fen: String,
    nodes: u64,
    nps: f64,
    elapsed_ms: f64,
}

#[derive(Serialize)]
struct ScoreResponse {
    fen: String,
    color: String,
    score: i32,
    detail: EvalBreakdown,
}

#[derive(Serialize)]
struct SelfplayResponse {
    result: String,
    plies: usize,
    moves: Vec<String>,
    fen: String,
}

// Server 模式的请求和响应结构
#[derive(Serialize, Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    fen: String,
    #[serde(default)]
    strategy: Option<String>,
    #[serde(default)]
    depth: Option<u32>,
    #[serde(default)]
    time_limit: Option<f64>,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Serialize, Default)]
struct ServerResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    best: Option<BestResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legal_moves: Option<Vec<String>>,
    // eval 命令的字段
    #[serde(skip_serializing_if = "Option::is_none")]
    eval: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<EvalBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServerResponse {
    fn success_best(best: BestResponse) -> Self {
        Self {
            ok: true,
            best: Some(best),
            ..Default::default()
        }
    }

    fn success_legal_moves(legal_moves: Vec<String>) -> Self {
        Self {
            ok: true,
            legal_moves: Some(legal_moves),
            ..Default::default()
        }
    }

    fn success_eval(detail: EvalBreakdown, color: Color) -> Self {
        Self {
            ok: true,
            eval: Some(detail.total()),
            detail: Some(detail),
            color: Some(color_to_str(color).to_string()),
            ..Default::default()
        }
    }

    fn error(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

fn color_to_str(color: Color) -> &'static str {
    match color {
        Color::Black => "black",
        Color::White => "white",
    }
}

fn result_to_str(result: GameResult) -> &'static str {
    match result {
        GameResult::Ongoing => "ongoing",
        GameResult::BlackWin => "black_win",
        GameResult::WhiteWin => "white_win",
        GameResult::Draw => "draw",
    }
}

fn calc_nps(nodes: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        nodes as f64 / elapsed_secs
    } else {
        0.0
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.unwrap_or_else(|e| format!("{{\"ok\":false,\"error\":\"{}\"}}", e))
}

fn exit_with_error(e: &str) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves { fen } => match legal_moves_from_fen(&fen) {
            Ok(moves) => {
                println!("Legal moves ({}):", moves.len());
                for mv in &moves {
                    println!("  {}", mv);
                }
            }
            Err(e) => exit_with_error(&e),
        },

        Commands::Best {
            fen,
            strategy,
            depth,
            time_limit,
            seed,
            json,
        } => {
            let config = AIConfig {
                depth,
                time_limit,
                seed,
            };

            match do_best(&fen, &strategy, &config) {
                Ok(best) => {
                    if json {
                        println!("{}", to_json(&best, true));
                    } else {
                        match &best.mv {
                            Some(mv) => println!("Best move (strategy={}): {}", strategy, mv),
                            None => println!("No move (strategy={})", strategy),
                        }
                        println!("Outcome: {}", best.outcome);
                        if let Some(score) = best.score {
                            println!("Score: {}", score);
                        }
                        if best.forced {
                            println!("Forced: only one legal move");
                        }
                        println!("FEN: {}", best.fen);
                        println!(
                            "\nStats: nodes={}, time={:.3}ms, nps={:.0}",
                            best.nodes, best.elapsed_ms, best.nps
                        );
                    }
                }
                Err(e) => exit_with_error(&e),
            }
        }

        Commands::Score { fen, json } => match parse_fen(&fen) {
            Ok(state) => {
                let detail = evaluate_detailed(&state.board(), state.turn);
                if json {
                    let response = ScoreResponse {
                        fen,
                        color: color_to_str(state.turn).to_string(),
                        score: detail.total(),
                        detail,
                    };
                    println!("{}", to_json(&response, true));
                } else {
                    println!(
                        "局面评估 ({} 走子，正分利黑): {}",
                        color_to_str(state.turn),
                        detail.total()
                    );
                    println!("{:#?}", detail);
                }
            }
            Err(e) => exit_with_error(&e),
        },

        Commands::Selfplay {
            fen,
            black,
            white,
            depth,
            max_plies,
            seed,
            json,
        } => {
            let config = AIConfig {
                depth,
                time_limit: None,
                seed,
            };
            let fen = fen.unwrap_or_else(|| START.to_string());

            match do_selfplay(&fen, &black, &white, &config, max_plies) {
                Ok(game) => {
                    if json {
                        println!("{}", to_json(&game, true));
                    } else {
                        for (i, pair) in game.moves.chunks(2).enumerate() {
                            println!("{:>3}. {}", i + 1, pair.join(" "));
                        }
                        println!("\nResult: {} after {} plies", game.result, game.plies);
                        println!("FEN: {}", game.fen);
                    }
                }
                Err(e) => exit_with_error(&e),
            }
        }

        Commands::Server => {
            run_server();
        }
    }
}

/// 执行一次选步并统计
fn do_best(fen: &str, strategy: &str, config: &AIConfig) -> Result<BestResponse, String> {
    let state = parse_fen(fen)?;
    let engine = Engine::with_strategy(strategy, config)?;
    let mut board = state.board();
    let cancel = AtomicBool::new(false);

    reset_node_count();
    let start = Instant::now();
    let outcome = engine.play_board(&mut board, state.turn, &cancel);
    let elapsed = start.elapsed().as_secs_f64();
    let nodes = get_node_count();

    let played = outcome.played();
    let next_turn = if played.is_some() {
        state.turn.opposite()
    } else {
        state.turn
    };

    Ok(BestResponse {
        outcome: outcome.label().to_string(),
        mv: played.map(|p| p.mv.to_string()),
        score: played.and_then(|p| p.score),
        forced: played.is_some_and(|p| p.forced),
        fen: board.to_fen(next_turn),
        nodes,
        nps: calc_nps(nodes, elapsed),
        elapsed_ms: elapsed * 1000.0,
    })
}

/// 自对弈：无子或无合法走法的一方判负，达到步数上限判和
fn do_selfplay(
    fen: &str,
    black: &str,
    white: &str,
    config: &AIConfig,
    max_plies: usize,
) -> Result<SelfplayResponse, String> {
    let state = parse_fen(fen)?;
    let black_engine = Engine::with_strategy(black, config)?;
    let white_engine = Engine::with_strategy(white, config)?;
    let mut board = state.board();
    let mut turn = state.turn;
    let mut moves = Vec::new();
    let cancel = AtomicBool::new(false);

    let mut result = GameResult::Draw;
    while moves.len() < max_plies {
        let status = board.game_result(turn);
        if status != GameResult::Ongoing {
            result = status;
            break;
        }

        let engine = match turn {
            Color::Black => &black_engine,
            Color::White => &white_engine,
        };
        match engine.play_board(&mut board, turn, &cancel) {
            Outcome::Played(played) => moves.push(played.mv.to_string()),
            other => return Err(format!("unexpected outcome: {}", other.label())),
        }
        turn = turn.opposite();
    }
    if moves.len() >= max_plies {
        let status = board.game_result(turn);
        if status != GameResult::Ongoing {
            result = status;
        }
    }

    Ok(SelfplayResponse {
        result: result_to_str(result).to_string(),
        plies: moves.len(),
        moves,
        fen: board.to_fen(turn),
    })
}

/// Server 模式主循环
/// 从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout
fn run_server() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        // 解析请求
        let request: ServerRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let response = ServerResponse::error(&format!("Invalid JSON: {}", e));
                println!("{}", to_json(&response, false));
                let _ = stdout.flush();
                continue;
            }
        };

        // 处理命令
        let response = match request.cmd.as_str() {
            "best" => handle_best_request(&request),
            "moves" => handle_moves_request(&request),
            "eval" => handle_eval_request(&request),
            "quit" => break,
            _ => ServerResponse::error(&format!("Unknown command: {}", request.cmd)),
        };

        // 返回响应
        println!("{}", to_json(&response, false));
        let _ = stdout.flush();
    }
}

/// 处理 best 命令
fn handle_best_request(request: &ServerRequest) -> ServerResponse {
    let strategy = request.strategy.as_deref().unwrap_or(DEFAULT_STRATEGY);
    let config = AIConfig {
        depth: request.depth.unwrap_or(1),
        time_limit: request.time_limit,
        seed: request.seed,
    };

    match do_best(&request.fen, strategy, &config) {
        Ok(best) => ServerResponse::success_best(best),
        Err(e) => ServerResponse::error(&format!("AI error: {}", e)),
    }
}

/// 处理 moves 命令
fn handle_moves_request(request: &ServerRequest) -> ServerResponse {
    match legal_moves_from_fen(&request.fen) {
        Ok(moves) => ServerResponse::success_legal_moves(moves),
        Err(e) => ServerResponse::error(&format!("Invalid FEN: {}", e)),
    }
}

/// 处理 eval 命令（静态评估）
fn handle_eval_request(request: &ServerRequest) -> ServerResponse {
    match parse_fen(&request.fen) {
        Ok(state) => {
            let detail = evaluate_detailed(&state.board(), state.turn);
            ServerResponse::success_eval(detail, state.turn)
        }
        Err(e) => ServerResponse::error(&format!("Invalid FEN: {}", e)),
    }
}
