use crate::store::GraphStore;
use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use std::collections::HashMap;

/// Tuning for the force simulation
#[derive(Debug, Clone, Copy)]
pub struct LayoutParams {
    pub force_charge: f32,
    pub force_spring: f32,
    pub force_max: f32,
    pub node_speed: f32,
    pub damping_factor: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            force_charge: 150.0,
            force_spring: 0.05,
            force_max: 100.0,
            node_speed: 3000.0,
            damping_factor: 0.9,
        }
    }
}

/// Fixed simulation step, one 60 fps frame
const SIMULATION_DT: f32 = 0.016;

/// Mass given to every simulated node
const NODE_MASS: f32 = 10.0;

/// Run the force simulation for a number of steps and write the settled
/// positions back into the store
pub fn apply_layout(store: &mut GraphStore, iterations: usize) {
    apply_layout_with_params(store, iterations, LayoutParams::default());
}

pub fn apply_layout_with_params(store: &mut GraphStore, iterations: usize, params: LayoutParams) {
    if iterations == 0 || store.node_count() == 0 {
        return;
    }

    let mut simulation = ForceGraph::<String, ()>::new(SimulationParameters {
        force_charge: params.force_charge,
        force_spring: params.force_spring,
        force_max: params.force_max,
        node_speed: params.node_speed,
        damping_factor: params.damping_factor,
    });

    let mut indices: HashMap<String, DefaultNodeIdx> = HashMap::new();
    for node in store.nodes() {
        let index = simulation.add_node(NodeData {
            x: node.x as f32,
            y: node.y as f32,
            mass: NODE_MASS,
            is_anchor: false,
            user_data: node.id.clone(),
        });
        indices.insert(node.id.clone(), index);
    }
    for edge in store.edges() {
        if let (Some(&source), Some(&target)) =
            (indices.get(&edge.source), indices.get(&edge.target))
        {
            simulation.add_edge(source, target, EdgeData::default());
        }
    }

    for _ in 0..iterations {
        simulation.update(SIMULATION_DT);
    }

    let mut positions: Vec<(String, f64, f64)> = Vec::with_capacity(store.node_count());
    simulation.visit_nodes(|node| {
        positions.push((node.data.user_data.clone(), node.x() as f64, node.y() as f64));
    });
    for (id, x, y) in positions {
        let _ = store.set_node_position(&id, x, y);
    }
}

/// Uniformly scale every position and size; sizes never drop below their
/// floors
pub fn scale_graph(store: &mut GraphStore, factor: f64) {
    for id in store.node_ids() {
        let Some((x, y, size)) = store.node(&id).map(|n| (n.x, n.y, n.size)) else {
            continue;
        };
        let _ = store.set_node_position(&id, x * factor, y * factor);
        let _ = store.set_node_size(&id, size * factor);
    }
    for id in store.edge_ids() {
        let Some(size) = store.edge(&id).map(|e| e.size) else {
            continue;
        };
        let _ = store.set_edge_size(&id, size * factor);
    }
}
