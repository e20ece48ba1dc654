// Demonstration: two tabular agents learn a cooperative matrix game from the
// shared team reward only, then act independently.
//
// Run from the repo root:
//   RUST_LOG=vdn=debug cargo run --example matrix_game -- --steps 2000 --seed 7

use std::env;

use tracing_subscriber::EnvFilter;
use vdn::algorithms::vdn::policy::best_joint_action;
use vdn::algorithms::vdn::{
    ActionValueFunction, Agent, EpsilonGreedyPolicy, ExplorationConfig, GreedyPolicy,
    JointTransition, QTable, Team, VdnConfig, VdnTrainer,
};

// Row agent chooses the first index, column agent the second.
const PAYOFF_ROW: [f64; 3] = [0.0, 2.0, 5.0];
const PAYOFF_COL: [f64; 3] = [1.0, 4.0, 0.5];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let steps: u64 = arg_value(&args, "--steps")
        .and_then(|s| s.parse().ok())
        .unwrap_or(2_000);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let team = Team::new(vec![
        Agent::with_id("row", QTable::new(3, 0.0, 0.05)),
        Agent::with_id("col", QTable::new(3, 0.0, 0.05)),
    ])?;
    let config = VdnConfig {
        target_update_period: 50,
        ..VdnConfig::default()
    };
    let mut trainer = VdnTrainer::new(team, config)?;

    let exploration = ExplorationConfig {
        epsilon_start: 1.0,
        epsilon_end: 0.1,
        decay_steps: steps / 2,
    };
    let mut explorers = vec![
        EpsilonGreedyPolicy::new(exploration.clone(), seed)?,
        EpsilonGreedyPolicy::new(exploration, seed.wrapping_add(1))?,
    ];

    let obs = vec![vec![0.0], vec![0.0]];
    for _ in 0..steps {
        let actions = trainer.online().act(&mut explorers, &obs, None)?;
        let action_values = trainer
            .online()
            .agents()
            .iter()
            .zip(&obs)
            .zip(&actions)
            .map(|((agent, o), &a)| agent.value_of(o, a))
            .collect::<Result<Vec<_>, _>>()?;
        let reward = PAYOFF_ROW[actions[0]] + PAYOFF_COL[actions[1]];

        let transition = JointTransition {
            observations: obs.clone(),
            actions,
            action_values,
            reward,
            next_observations: obs.clone(),
            next_legal_actions: None,
            discount: 0.0,
        };
        trainer.train(&[transition])?;
    }

    let team = trainer.into_online();
    let per_agent: Vec<Vec<f64>> = team
        .agents()
        .iter()
        .zip(&obs)
        .map(|(a, o)| a.q.action_values(o))
        .collect();

    let mut greedy = vec![GreedyPolicy; 2];
    let decentralized = team.act(&mut greedy, &obs, None)?;
    let (centralized, best_value) = best_joint_action(&per_agent)?;

    for (agent, values) in team.agents().iter().zip(&per_agent) {
        println!("{:>4}: {:?}", agent.id, values);
    }
    println!("decentralized greedy joint action: {:?}", decentralized);
    println!(
        "exhaustive best joint action:      {:?} (team value {:.3})",
        centralized, best_value
    );

    Ok(())
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
