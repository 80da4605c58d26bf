mod codel_config;
mod rec_inv_sqrt;
mod sim_time;
mod simulator;
