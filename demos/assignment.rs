use boxtrack::hungarian::HungarianSolver;
use ndarray::Array2;

fn main() {
    println!("Solving a detection-to-track assignment...");

    // A case where greedy matching gets the pairing wrong: grabbing the
    // cheapest pair (track 0, detection 0) at 0.4 forces (1, 1) at 0.9 for a
    // total of 1.3; the optimal pairing totals 1.1
    let cost_matrix = Array2::from_shape_vec(
        (2, 2),
        vec![
            0.4, 0.6, // Track 0 costs
            0.5, 0.9, // Track 1 costs
        ],
    )
    .unwrap();

    let result = HungarianSolver::solve(cost_matrix.view(), 1.0);

    println!("Assignments: {:?}", result.assignments);
    println!("Total cost: {:.2}", result.total_cost);

    // Rectangular case: more detections than tracks, the surplus stays
    // unassigned and would spawn new tracks
    println!("\nSolving a 2x4 assignment...");
    let wide_matrix = Array2::from_shape_vec(
        (2, 4),
        vec![
            0.2, 0.8, 0.9, 0.7, // Track 0 costs
            0.9, 0.3, 0.8, 0.6, // Track 1 costs
        ],
    )
    .unwrap();

    let wide_result = HungarianSolver::solve(wide_matrix.view(), 0.5);
    println!("Assignments: {:?}", wide_result.assignments);
    println!("Unassigned detections: {:?}", wide_result.unassigned_detections);

    // Larger matrix to get a feel for solve time
    println!("\nSolving a 50x50 assignment...");
    let large_matrix = Array2::from_shape_fn((50, 50), |(i, j)| ((i + j) as f32 % 10.0) / 10.0);

    let start = std::time::Instant::now();
    let large_result = HungarianSolver::solve(large_matrix.view(), 0.5);
    let duration = start.elapsed();

    println!("Solved in {:?}", duration);
    println!("Found {} assignments", large_result.assignments.len());

    // IoU form: the threshold gates out weakly overlapping pairs
    println!("\nSolving from an IoU matrix...");
    let iou_matrix = Array2::from_shape_fn((10, 10), |(i, j)| if i == j { 0.8 } else { 0.2 });

    let iou_result = HungarianSolver::solve_iou(iou_matrix.view(), 0.5);
    println!("IoU assignments: {:?}", iou_result.assignments);
}
