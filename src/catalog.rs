//! Static product catalog for every supported platform.
//!
//! Two tables exist per platform:
//!
//! | Table            | Meaning |
//! |------------------|---------|
//! | `*_ADDED`        | Products that appear at the keyed release and stay available in every later release |
//! | `*_RETIRED`      | Products whose name is valid up to and including the keyed release, then renamed or dropped |
//!
//! The lists are kept in Rust so a typo in a product name shows up as a test
//! failure instead of an installer error. Releases with no changes for a
//! platform have no entry; the resolver folds the surrounding entries.
//!
//! Nothing new was added in R2024a through R2025b, so the newest `*_ADDED`
//! entry is R2023b for every platform.

use crate::types::{Platform, Release};

/// One table row: the release a change takes effect at and the products it covers.
pub type CatalogEntry = (Release, &'static [&'static str]);

/// Rows of products that become available at their release and persist forward.
pub fn added_forward(platform: Platform) -> &'static [CatalogEntry] {
    match platform {
        Platform::Windows => WINDOWS_ADDED,
        Platform::Linux => LINUX_ADDED,
        Platform::MacOsIntel => MACOS_INTEL_ADDED,
        Platform::MacOsArm => MACOS_ARM_ADDED,
    }
}

/// Rows of products that stay valid up to their release (inclusive) only.
pub fn valid_backward(platform: Platform) -> &'static [CatalogEntry] {
    match platform {
        Platform::Windows => WINDOWS_RETIRED,
        Platform::Linux => LINUX_RETIRED,
        Platform::MacOsIntel => MACOS_INTEL_RETIRED,
        Platform::MacOsArm => MACOS_ARM_RETIRED,
    }
}

// ============================================================================
// Added-forward tables
// ============================================================================

/// Products first shipped for Windows at the keyed release.
const WINDOWS_ADDED: &[CatalogEntry] = &[
    (
        Release::R2017b,
        &[
            "Aerospace_Blockset",
            "Aerospace_Toolbox",
            "Antenna_Toolbox",
            "Bioinformatics_Toolbox",
            "Control_System_Toolbox",
            "Curve_Fitting_Toolbox",
            "DSP_System_Toolbox",
            "Data_Acquisition_Toolbox",
            "Database_Toolbox",
            "Datafeed_Toolbox",
            "Econometrics_Toolbox",
            "Embedded_Coder",
            "Financial_Instruments_Toolbox",
            "Financial_Toolbox",
            "Fixed-Point_Designer",
            "Fuzzy_Logic_Toolbox",
            "GPU_Coder",
            "Global_Optimization_Toolbox",
            "HDL_Coder",
            "HDL_Verifier",
            "Image_Acquisition_Toolbox",
            "Image_Processing_Toolbox",
            "Instrument_Control_Toolbox",
            "MATLAB",
            "MATLAB_Coder",
            "MATLAB_Compiler",
            "MATLAB_Compiler_SDK",
            "MATLAB_Production_Server",
            "MATLAB_Report_Generator",
            "Mapping_Toolbox",
            "Model_Predictive_Control_Toolbox",
            "Model-Based_Calibration_Toolbox",
            "Network_License_Manager",
            "Optimization_Toolbox",
            "Parallel_Computing_Toolbox",
            "Partial_Differential_Equation_Toolbox",
            "Phased_Array_System_Toolbox",
            "Polyspace_Bug_Finder",
            "Polyspace_Code_Prover",
            "Powertrain_Blockset",
            "RF_Blockset",
            "RF_Toolbox",
            "Risk_Management_Toolbox",
            "Robotics_System_Toolbox",
            "Robust_Control_Toolbox",
            "Signal_Processing_Toolbox",
            "SimBiology",
            "SimEvents",
            "Simscape",
            "Simscape_Driveline",
            "Simscape_Fluids",
            "Simscape_Multibody",
            "Simulink",
            "Simulink_3D_Animation",
            "Simulink_Check",
            "Simulink_Coder",
            "Simulink_Control_Design",
            "Simulink_Coverage",
            "Simulink_Design_Optimization",
            "Simulink_Design_Verifier",
            "Simulink_Desktop_Real-Time",
            "Simulink_PLC_Coder",
            "Simulink_Real-Time",
            "Simulink_Report_Generator",
            "Simulink_Test",
            "Spreadsheet_Link",
            "Stateflow",
            "Statistics_and_Machine_Learning_Toolbox",
            "Symbolic_Math_Toolbox",
            "System_Identification_Toolbox",
            "Text_Analytics_Toolbox",
            "Vehicle_Network_Toolbox",
            "Vision_HDL_Toolbox",
            "Wavelet_Toolbox",
        ],
    ),
    (
        Release::R2018a,
        &[
            "Predictive_Maintenance_Toolbox",
            "Vehicle_Dynamics_Blockset",
        ],
    ),
    (
        Release::R2018b,
        &[
            "Communications_Toolbox",
            "Simscape_Electrical",
            "Sensor_Fusion_and_Tracking_Toolbox",
            "Deep_Learning_Toolbox",
            "5G_Toolbox",
            "WLAN_Toolbox",
            "LTE_Toolbox",
        ],
    ),
    (
        Release::R2019a,
        &[
            "System_Composer",
            "SoC_Blockset",
            "SerDes_Toolbox",
            "Reinforcement_Learning_Toolbox",
            "Audio_Toolbox",
            "Mixed-Signal_Blockset",
            "AUTOSAR_Blockset",
            "MATLAB_Parallel_Server",
            "Polyspace_Bug_Finder_Server",
            "Polyspace_Code_Prover_Server",
            "Automated_Driving_Toolbox",
            "Computer_Vision_Toolbox",
        ],
    ),
    (
        Release::R2019b,
        &[
            "ROS_Toolbox",
            "Navigation_Toolbox",
        ],
    ),
    (
        Release::R2020a,
        &[
            "Simulink_Compiler",
            "Motor_Control_Blockset",
            "MATLAB_Web_App_Server",
            "Wireless_HDL_Toolbox",
        ],
    ),
    (
        Release::R2020b,
        &[
            "UAV_Toolbox",
            "Radar_Toolbox",
            "Lidar_Toolbox",
            "Deep_Learning_HDL_Toolbox",
        ],
    ),
    (
        Release::R2021a,
        &[
            "Satellite_Communications_Toolbox",
            "DDS_Blockset",
        ],
    ),
    (
        Release::R2021b,
        &[
            "Signal_Integrity_Toolbox",
            "RF_PCB_Toolbox",
        ],
    ),
    (
        Release::R2022a,
        &[
            "Wireless_Testbench",
            "Bluetooth_Toolbox",
            "DSP_HDL_Toolbox",
            "Requirements_Toolbox",
            "Industrial_Communication_Toolbox",
        ],
    ),
    (
        Release::R2022b,
        &[
            "Medical_Imaging_Toolbox",
            "Simscape_Battery",
        ],
    ),
    (
        Release::R2023a,
        &[
            "MATLAB_Test",
            "C2000_Microcontroller_Blockset",
        ],
    ),
    (
        Release::R2023b,
        &[
            "Simulink_Fault_Analyzer",
            "Polyspace_Test",
        ],
    ),
];

/// Products first shipped for Linux at the keyed release.
const LINUX_ADDED: &[CatalogEntry] = &[
    (
        Release::R2017b,
        &[
            "Aerospace_Blockset",
            "Aerospace_Toolbox",
            "Antenna_Toolbox",
            "Bioinformatics_Toolbox",
            "Control_System_Toolbox",
            "Curve_Fitting_Toolbox",
            "DSP_System_Toolbox",
            "Database_Toolbox",
            "Datafeed_Toolbox",
            "Econometrics_Toolbox",
            "Embedded_Coder",
            "Financial_Instruments_Toolbox",
            "Financial_Toolbox",
            "Fixed-Point_Designer",
            "Fuzzy_Logic_Toolbox",
            "GPU_Coder",
            "Global_Optimization_Toolbox",
            "HDL_Coder",
            "HDL_Verifier",
            "Image_Acquisition_Toolbox",
            "Image_Processing_Toolbox",
            "Instrument_Control_Toolbox",
            "MATLAB",
            "MATLAB_Coder",
            "MATLAB_Compiler",
            "MATLAB_Compiler_SDK",
            "MATLAB_Production_Server",
            "MATLAB_Report_Generator",
            "Mapping_Toolbox",
            "Model_Predictive_Control_Toolbox",
            "Network_License_Manager",
            "Optimization_Toolbox",
            "Parallel_Computing_Toolbox",
            "Partial_Differential_Equation_Toolbox",
            "Phased_Array_System_Toolbox",
            "Polyspace_Bug_Finder",
            "Polyspace_Code_Prover",
            "Powertrain_Blockset",
            "RF_Blockset",
            "RF_Toolbox",
            "Risk_Management_Toolbox",
            "Robotics_System_Toolbox",
            "Robust_Control_Toolbox",
            "Signal_Processing_Toolbox",
            "SimBiology",
            "SimEvents",
            "Simscape",
            "Simscape_Driveline",
            "Simscape_Fluids",
            "Simscape_Multibody",
            "Simulink",
            "Simulink_3D_Animation",
            "Simulink_Check",
            "Simulink_Coder",
            "Simulink_Control_Design",
            "Simulink_Coverage",
            "Simulink_Design_Optimization",
            "Simulink_Design_Verifier",
            "Simulink_Report_Generator",
            "Simulink_Test",
            "Stateflow",
            "Statistics_and_Machine_Learning_Toolbox",
            "Symbolic_Math_Toolbox",
            "System_Identification_Toolbox",
            "Text_Analytics_Toolbox",
            "Vision_HDL_Toolbox",
            "Wavelet_Toolbox",
        ],
    ),
    (
        Release::R2018a,
        &[
            "Predictive_Maintenance_Toolbox",
            "Vehicle_Network_Toolbox",
            "Vehicle_Dynamics_Blockset",
        ],
    ),
    (
        Release::R2018b,
        &[
            "Communications_Toolbox",
            "Simscape_Electrical",
            "Sensor_Fusion_and_Tracking_Toolbox",
            "Deep_Learning_Toolbox",
            "5G_Toolbox",
            "WLAN_Toolbox",
            "LTE_Toolbox",
        ],
    ),
    (
        Release::R2019a,
        &[
            "System_Composer",
            "SoC_Blockset",
            "SerDes_Toolbox",
            "Reinforcement_Learning_Toolbox",
            "Audio_Toolbox",
            "Mixed-Signal_Blockset",
            "AUTOSAR_Blockset",
            "MATLAB_Parallel_Server",
            "Polyspace_Bug_Finder_Server",
            "Polyspace_Code_Prover_Server",
            "Automated_Driving_Toolbox",
            "Computer_Vision_Toolbox",
        ],
    ),
    (
        Release::R2019b,
        &[
            "ROS_Toolbox",
            "Simulink_PLC_Coder",
            "Navigation_Toolbox",
        ],
    ),
    (
        Release::R2020a,
        &[
            "Simulink_Compiler",
            "Motor_Control_Blockset",
            "MATLAB_Web_App_Server",
            "Wireless_HDL_Toolbox",
        ],
    ),
    (
        Release::R2020b,
        &[
            "UAV_Toolbox",
            "Radar_Toolbox",
            "Lidar_Toolbox",
            "Deep_Learning_HDL_Toolbox",
        ],
    ),
    (
        Release::R2021a,
        &[
            "Satellite_Communications_Toolbox",
            "DDS_Blockset",
        ],
    ),
    (
        Release::R2021b,
        &[
            "Signal_Integrity_Toolbox",
            "RF_PCB_Toolbox",
        ],
    ),
    (
        Release::R2022a,
        &[
            "Wireless_Testbench",
            "Simulink_Real-Time",
            "Bluetooth_Toolbox",
            "DSP_HDL_Toolbox",
            "Requirements_Toolbox",
            "Industrial_Communication_Toolbox",
        ],
    ),
    (
        Release::R2022b,
        &[
            "Medical_Imaging_Toolbox",
            "Simscape_Battery",
        ],
    ),
    (
        Release::R2023a,
        &[
            "MATLAB_Test",
            "C2000_Microcontroller_Blockset",
        ],
    ),
    (
        Release::R2023b,
        &[
            "Simulink_Fault_Analyzer",
            "Polyspace_Test",
            "Simulink_Desktop_Real-Time",
        ],
    ),
];

/// Products first shipped for Intel macOS at the keyed release.
const MACOS_INTEL_ADDED: &[CatalogEntry] = &[
    (
        Release::R2017b,
        &[
            "Aerospace_Blockset",
            "Aerospace_Toolbox",
            "Antenna_Toolbox",
            "Bioinformatics_Toolbox",
            "Control_System_Toolbox",
            "Curve_Fitting_Toolbox",
            "DSP_System_Toolbox",
            "Database_Toolbox",
            "Datafeed_Toolbox",
            "Econometrics_Toolbox",
            "Embedded_Coder",
            "Financial_Instruments_Toolbox",
            "Financial_Toolbox",
            "Fixed-Point_Designer",
            "Fuzzy_Logic_Toolbox",
            "Global_Optimization_Toolbox",
            "HDL_Coder",
            "Image_Acquisition_Toolbox",
            "Image_Processing_Toolbox",
            "Instrument_Control_Toolbox",
            "MATLAB",
            "MATLAB_Coder",
            "MATLAB_Compiler",
            "MATLAB_Compiler_SDK",
            "MATLAB_Production_Server",
            "MATLAB_Report_Generator",
            "Mapping_Toolbox",
            "Model_Predictive_Control_Toolbox",
            "Network_License_Manager",
            "Optimization_Toolbox",
            "Parallel_Computing_Toolbox",
            "Partial_Differential_Equation_Toolbox",
            "Phased_Array_System_Toolbox",
            "Polyspace_Bug_Finder",
            "Polyspace_Code_Prover",
            "Powertrain_Blockset",
            "RF_Blockset",
            "RF_Toolbox",
            "Risk_Management_Toolbox",
            "Robotics_System_Toolbox",
            "Robust_Control_Toolbox",
            "Signal_Processing_Toolbox",
            "SimBiology",
            "SimEvents",
            "Simscape",
            "Simscape_Driveline",
            "Simscape_Fluids",
            "Simscape_Multibody",
            "Simulink",
            "Simulink_3D_Animation",
            "Simulink_Check",
            "Simulink_Coder",
            "Simulink_Control_Design",
            "Simulink_Coverage",
            "Simulink_Design_Optimization",
            "Simulink_Design_Verifier",
            "Simulink_Desktop_Real-Time",
            "Simulink_Report_Generator",
            "Simulink_Test",
            "Stateflow",
            "Statistics_and_Machine_Learning_Toolbox",
            "Symbolic_Math_Toolbox",
            "System_Identification_Toolbox",
            "Text_Analytics_Toolbox",
            "Wavelet_Toolbox",
        ],
    ),
    (
        Release::R2018a,
        &[
            "Predictive_Maintenance_Toolbox",
            "Vehicle_Dynamics_Blockset",
        ],
    ),
    (
        Release::R2018b,
        &[
            "Communications_Toolbox",
            "Simscape_Electrical",
            "Sensor_Fusion_and_Tracking_Toolbox",
            "Deep_Learning_Toolbox",
            "5G_Toolbox",
            "WLAN_Toolbox",
            "LTE_Toolbox",
        ],
    ),
    (
        Release::R2019a,
        &[
            "System_Composer",
            "SerDes_Toolbox",
            "Reinforcement_Learning_Toolbox",
            "Audio_Toolbox",
            "Mixed-Signal_Blockset",
            "AUTOSAR_Blockset",
            "Polyspace_Bug_Finder_Server",
            "Polyspace_Code_Prover_Server",
            "Automated_Driving_Toolbox",
            "Computer_Vision_Toolbox",
        ],
    ),
    (
        Release::R2019b,
        &[
            "ROS_Toolbox",
            "Simulink_PLC_Coder",
            "Navigation_Toolbox",
        ],
    ),
    (
        Release::R2020a,
        &[
            "Simulink_Compiler",
            "Motor_Control_Blockset",
            "MATLAB_Web_App_Server",
            "Wireless_HDL_Toolbox",
        ],
    ),
    (
        Release::R2020b,
        &[
            "UAV_Toolbox",
            "Radar_Toolbox",
            "Lidar_Toolbox",
        ],
    ),
    (
        Release::R2021a,
        &[
            "Satellite_Communications_Toolbox",
            "DDS_Blockset",
        ],
    ),
    (
        Release::R2021b,
        &[
            "RF_PCB_Toolbox",
        ],
    ),
    (
        Release::R2022a,
        &[
            "Bluetooth_Toolbox",
            "DSP_HDL_Toolbox",
            "Requirements_Toolbox",
            "Industrial_Communication_Toolbox",
        ],
    ),
    (
        Release::R2022b,
        &[
            "Medical_Imaging_Toolbox",
            "Simscape_Battery",
        ],
    ),
    (
        Release::R2023a,
        &[
            "MATLAB_Test",
        ],
    ),
    (
        Release::R2023b,
        &[
            "Simulink_Fault_Analyzer",
            "Polyspace_Test",
        ],
    ),
];

/// Apple Silicon builds start at R2023b with the whole catalog at once.
const MACOS_ARM_ADDED: &[CatalogEntry] = &[
    (
        Release::R2023b,
        &[
            "5G_Toolbox",
            "AUTOSAR_Blockset",
            "Aerospace_Blockset",
            "Aerospace_Toolbox",
            "Antenna_Toolbox",
            "Audio_Toolbox",
            "Automated_Driving_Toolbox",
            "Bioinformatics_Toolbox",
            "Bluetooth_Toolbox",
            "Communications_Toolbox",
            "Computer_Vision_Toolbox",
            "Control_System_Toolbox",
            "Curve_Fitting_Toolbox",
            "DDS_Blockset",
            "DSP_HDL_Toolbox",
            "DSP_System_Toolbox",
            "Database_Toolbox",
            "Datafeed_Toolbox",
            "Deep_Learning_Toolbox",
            "Econometrics_Toolbox",
            "Embedded_Coder",
            "Financial_Instruments_Toolbox",
            "Financial_Toolbox",
            "Fixed-Point_Designer",
            "Fuzzy_Logic_Toolbox",
            "Global_Optimization_Toolbox",
            "HDL_Coder",
            "Image_Acquisition_Toolbox",
            "Image_Processing_Toolbox",
            "Industrial_Communication_Toolbox",
            "Instrument_Control_Toolbox",
            "LTE_Toolbox",
            "Lidar_Toolbox",
            "MATLAB",
            "MATLAB_Coder",
            "MATLAB_Compiler",
            "MATLAB_Compiler_SDK",
            "MATLAB_Report_Generator",
            "MATLAB_Test",
            "Mapping_Toolbox",
            "Medical_Imaging_Toolbox",
            "Mixed-Signal_Blockset",
            "Model_Predictive_Control_Toolbox",
            "Motor_Control_Blockset",
            "Navigation_Toolbox",
            "Network_License_Manager",
            "Optimization_Toolbox",
            "Parallel_Computing_Toolbox",
            "Partial_Differential_Equation_Toolbox",
            "Phased_Array_System_Toolbox",
            "Powertrain_Blockset",
            "Predictive_Maintenance_Toolbox",
            "RF_Blockset",
            "RF_PCB_Toolbox",
            "RF_Toolbox",
            "ROS_Toolbox",
            "Radar_Toolbox",
            "Reinforcement_Learning_Toolbox",
            "Requirements_Toolbox",
            "Risk_Management_Toolbox",
            "Robotics_System_Toolbox",
            "Robust_Control_Toolbox",
            "Satellite_Communications_Toolbox",
            "Sensor_Fusion_and_Tracking_Toolbox",
            "SerDes_Toolbox",
            "Signal_Processing_Toolbox",
            "SimBiology",
            "SimEvents",
            "Simscape",
            "Simscape_Battery",
            "Simscape_Driveline",
            "Simscape_Electrical",
            "Simscape_Fluids",
            "Simscape_Multibody",
            "Simulink",
            "Simulink_3D_Animation",
            "Simulink_Check",
            "Simulink_Coder",
            "Simulink_Compiler",
            "Simulink_Control_Design",
            "Simulink_Coverage",
            "Simulink_Design_Optimization",
            "Simulink_Design_Verifier",
            "Simulink_Fault_Analyzer",
            "Simulink_PLC_Coder",
            "Simulink_Report_Generator",
            "Simulink_Test",
            "Stateflow",
            "Statistics_and_Machine_Learning_Toolbox",
            "Symbolic_Math_Toolbox",
            "System_Composer",
            "System_Identification_Toolbox",
            "Text_Analytics_Toolbox",
            "UAV_Toolbox",
            "Vehicle_Dynamics_Blockset",
            "WLAN_Toolbox",
            "Wavelet_Toolbox",
            "Wireless_HDL_Toolbox",
        ],
    ),
];

// ============================================================================
// Valid-backward tables
// ============================================================================

const WINDOWS_RETIRED: &[CatalogEntry] = &[
    (
        Release::R2018a,
        &[
            "Communications_System_Toolbox",
            "LTE_System_Toolbox",
            "Neural_Network_Toolbox",
            "Simscape_Electronics",
            "Simscape_Power_Systems",
            "WLAN_System_Toolbox",
        ],
    ),
    (
        Release::R2018b,
        &[
            "Audio_System_Toolbox",
            "Automated_Driving_System_Toolbox",
            "Computer_Vision_System_Toolbox",
            "MATLAB_Distributed_Computing_Server",
        ],
    ),
    (
        Release::R2019b,
        &[
            "LTE_HDL_Toolbox",
        ],
    ),
    (
        Release::R2020b,
        &[
            "Trading_Toolbox",
        ],
    ),
    (
        Release::R2021b,
        &[
            "Simulink_Requirements",
            "OPC_Toolbox",
        ],
    ),
    (
        Release::R2024b,
        &[
            "Filter_Design_HDL_Coder",
        ],
    ),
];

const LINUX_RETIRED: &[CatalogEntry] = &[
    (
        Release::R2018a,
        &[
            "Communications_System_Toolbox",
            "LTE_System_Toolbox",
            "Neural_Network_Toolbox",
            "Simscape_Electronics",
            "Simscape_Power_Systems",
            "WLAN_System_Toolbox",
        ],
    ),
    (
        Release::R2018b,
        &[
            "Audio_System_Toolbox",
            "Automated_Driving_System_Toolbox",
            "Computer_Vision_System_Toolbox",
            "MATLAB_Distributed_Computing_Server",
        ],
    ),
    (
        Release::R2019b,
        &[
            "LTE_HDL_Toolbox",
        ],
    ),
    (
        Release::R2020b,
        &[
            "Trading_Toolbox",
        ],
    ),
    (
        Release::R2021b,
        &[
            "Simulink_Requirements",
        ],
    ),
    (
        Release::R2024b,
        &[
            "Filter_Design_HDL_Coder",
        ],
    ),
];

const MACOS_INTEL_RETIRED: &[CatalogEntry] = &[
    (
        Release::R2018a,
        &[
            "Communications_System_Toolbox",
            "LTE_System_Toolbox",
            "Neural_Network_Toolbox",
            "Simscape_Electronics",
            "Simscape_Power_Systems",
            "WLAN_System_Toolbox",
        ],
    ),
    (
        Release::R2018b,
        &[
            "Audio_System_Toolbox",
            "Automated_Driving_System_Toolbox",
            "Computer_Vision_System_Toolbox",
            "MATLAB_Distributed_Computing_Server",
        ],
    ),
    (
        Release::R2019b,
        &[
            "LTE_HDL_Toolbox",
        ],
    ),
    (
        Release::R2020b,
        &[
            "Trading_Toolbox",
        ],
    ),
    (
        Release::R2021b,
        &[
            "Simulink_Requirements",
            "MATLAB_Parallel_Server",
        ],
    ),
    (
        Release::R2024b,
        &[
            "Filter_Design_HDL_Coder",
        ],
    ),
];

const MACOS_ARM_RETIRED: &[CatalogEntry] = &[
    (
        Release::R2024b,
        &[
            "Filter_Design_HDL_Coder",
        ],
    ),
];
